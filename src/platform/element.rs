//! Element resolution: queries, handles, and the registry trait

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A stable way of identifying elements in the host document.
///
/// Only three forms are understood: `#id`, `.class` and a bare tag name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementQuery {
    Id(String),
    Class(String),
    Tag(String),
}

impl ElementQuery {
    pub fn id(id: impl Into<String>) -> Self {
        ElementQuery::Id(id.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        ElementQuery::Tag(tag.into())
    }

    /// Parse a selector in the `#id` / `.class` / `tag` grammar.
    pub fn parse(selector: &str) -> Result<Self> {
        let s = selector.trim();
        let (ctor, name): (fn(String) -> ElementQuery, &str) = if let Some(rest) = s.strip_prefix('#') {
            (ElementQuery::Id, rest)
        } else if let Some(rest) = s.strip_prefix('.') {
            (ElementQuery::Class, rest)
        } else {
            (ElementQuery::Tag, s)
        };

        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::ParseError(format!(
                "unsupported selector '{}': expected #id, .class or a tag name",
                selector
            )));
        }

        let name = match s.chars().next() {
            Some('#') | Some('.') => name.to_string(),
            _ => name.to_ascii_lowercase(),
        };
        Ok(ctor(name))
    }

    /// Whether at most one element can ever match.
    pub fn is_unique(&self) -> bool {
        matches!(self, ElementQuery::Id(_))
    }
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementQuery::Id(id) => write!(f, "#{}", id),
            ElementQuery::Class(class) => write!(f, ".{}", class),
            ElementQuery::Tag(tag) => f.write_str(tag),
        }
    }
}

impl TryFrom<String> for ElementQuery {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        ElementQuery::parse(&value)
    }
}

impl From<ElementQuery> for String {
    fn from(q: ElementQuery) -> Self {
        q.to_string()
    }
}

/// A live reference to one element in the host document.
///
/// Handles mutate through `&self`; hosts serialize access internally.
pub trait ElementHandle {
    /// Rendered height including padding and border, in CSS pixels.
    fn outer_height(&self) -> f64;

    /// Fix the element's height to `px` CSS pixels.
    fn set_height(&self, px: f64);

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;
}

/// Resolves queries to element handles.
///
/// An empty vector is an empty selection: callers treat it as "nothing to
/// do", never as an error.
pub trait ElementRegistry: Send + Sync {
    fn resolve<'a>(&'a self, query: &ElementQuery) -> Vec<Box<dyn ElementHandle + 'a>>;
}

impl<T: ElementRegistry + ?Sized> ElementRegistry for Arc<T> {
    fn resolve<'a>(&'a self, query: &ElementQuery) -> Vec<Box<dyn ElementHandle + 'a>> {
        (**self).resolve(query)
    }
}

impl<T: ElementRegistry + ?Sized> ElementRegistry for &T {
    fn resolve<'a>(&'a self, query: &ElementQuery) -> Vec<Box<dyn ElementHandle + 'a>> {
        (**self).resolve(query)
    }
}
