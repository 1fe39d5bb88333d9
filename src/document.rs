//! In-memory document host.
//!
//! `HeadlessDocument` parses markup once with `scraper` and keeps a flat
//! element arena (tag, id, classes, inline style) that the synchronizer can
//! query and mutate. Heights come from inline styles only; there is no
//! cascade and no text layout.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::platform::{ElementHandle, ElementQuery, ElementRegistry};
use crate::style::{self, parse_declarations};
use crate::Result;

/// One element of the arena, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Inline style declarations as `(property, value)` in source order
    pub style: Vec<(String, String)>,
    pub parent: Option<usize>,
}

impl ElementNode {
    fn matches(&self, query: &ElementQuery) -> bool {
        match query {
            ElementQuery::Id(id) => self.id.as_deref() == Some(id.as_str()),
            ElementQuery::Class(class) => self.classes.iter().any(|c| c == class),
            ElementQuery::Tag(tag) => self.tag == *tag,
        }
    }

    /// Last declared value for `property`, if any
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    fn set_style(&mut self, property: &str, value: String) {
        self.style.retain(|(p, _)| p != property);
        self.style.push((property.to_string(), value));
    }

    /// Height plus vertical padding and visible border, from inline styles.
    pub fn outer_height(&self) -> f64 {
        style::outer_height(&self.style)
    }
}

/// Serializable view of the whole document state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub elements: Vec<ElementNode>,
}

/// A parsed document whose elements can be resolved and mutated in place.
pub struct HeadlessDocument {
    nodes: Mutex<Vec<ElementNode>>,
}

impl HeadlessDocument {
    /// Parse HTML markup. Malformed markup is recovered the way browsers do.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut nodes = Vec::new();

        // Depth-first traversal that preserves document order.
        let mut stack: Vec<(ElementRef, Option<usize>)> = vec![(document.root_element(), None)];
        while let Some((node, parent)) = stack.pop() {
            let el = node.value();
            let classes = el
                .attr("class")
                .map(|c| c.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            let style = el.attr("style").map(parse_declarations).unwrap_or_default();

            let idx = nodes.len();
            nodes.push(ElementNode {
                tag: el.name().to_ascii_lowercase(),
                id: el.attr("id").map(str::to_string),
                classes,
                style,
                parent,
            });

            let children: Vec<_> = node.children().filter_map(ElementRef::wrap).collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(idx)));
            }
        }

        log::debug!("parsed document with {} element(s)", nodes.len());
        HeadlessDocument {
            nodes: Mutex::new(nodes),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let html = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_html(&html))
    }

    fn nodes(&self) -> MutexGuard<'_, Vec<ElementNode>> {
        self.nodes.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the first element matching `query`
    pub fn find(&self, query: &ElementQuery) -> Option<ElementNode> {
        self.nodes().iter().find(|n| n.matches(query)).cloned()
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            elements: self.nodes().clone(),
        }
    }

    /// SHA-256 hex digest of the serialized snapshot.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(&self.snapshot())?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

struct NodeHandle<'a> {
    doc: &'a HeadlessDocument,
    idx: usize,
}

impl NodeHandle<'_> {
    fn with<R>(&self, f: impl FnOnce(&mut ElementNode) -> R) -> R {
        let mut nodes = self.doc.nodes();
        f(&mut nodes[self.idx])
    }
}

impl ElementHandle for NodeHandle<'_> {
    fn outer_height(&self) -> f64 {
        self.with(|n| n.outer_height())
    }

    fn set_height(&self, px: f64) {
        self.with(|n| n.set_style("height", format!("{}px", px)));
    }

    fn add_class(&self, class: &str) {
        self.with(|n| {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, class: &str) {
        self.with(|n| n.classes.retain(|c| c != class));
    }

    fn has_class(&self, class: &str) -> bool {
        self.with(|n| n.classes.iter().any(|c| c == class))
    }
}

impl ElementRegistry for HeadlessDocument {
    fn resolve<'a>(&'a self, query: &ElementQuery) -> Vec<Box<dyn ElementHandle + 'a>> {
        let indices: Vec<usize> = {
            let nodes = self.nodes();
            let mut matched = nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.matches(query))
                .map(|(idx, _)| idx);
            if query.is_unique() {
                matched.next().into_iter().collect()
            } else {
                matched.collect()
            }
        };

        log::trace!("resolved {} to {} element(s)", query, indices.len());
        indices
            .into_iter()
            .map(|idx| Box::new(NodeHandle { doc: self, idx }) as Box<dyn ElementHandle + 'a>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_collects_ids_classes_and_styles() {
        let doc = HeadlessDocument::from_html(
            r#"<html><body class="page  wide"><div id="title-bar" style="height: 48px">T</div><div id="title-buffer"></div></body></html>"#,
        );
        let body = doc.find(&ElementQuery::tag("body")).unwrap();
        assert_eq!(body.classes, vec!["page".to_string(), "wide".to_string()]);
        let bar = doc.find(&ElementQuery::id("title-bar")).unwrap();
        assert_eq!(bar.style_value("height"), Some("48px"));
        assert_eq!(bar.outer_height(), 48.0);
        assert!(doc.find(&ElementQuery::id("nope")).is_none());
    }

    #[test]
    fn header_metrics_follow_computed_style() {
        let doc = HeadlessDocument::from_html(
            r#"<div id="h" style="height: 80px !important"></div><div id="b" style="height: 10px; border-width: 5px"></div>"#,
        );
        let h = doc.find(&ElementQuery::id("h")).unwrap();
        assert_eq!(h.style_value("height"), Some("80px"));
        assert_eq!(h.outer_height(), 80.0);
        assert_eq!(doc.find(&ElementQuery::id("b")).unwrap().outer_height(), 10.0);
    }

    #[test]
    fn id_queries_resolve_to_first_match_only() {
        let doc = HeadlessDocument::from_html(r#"<div id="dup"></div><div id="dup"></div><p></p><p></p>"#);
        assert_eq!(doc.resolve(&ElementQuery::id("dup")).len(), 1);
        assert_eq!(doc.resolve(&ElementQuery::tag("p")).len(), 2);
        assert!(doc.resolve(&ElementQuery::Class("none".into())).is_empty());
    }

    #[test]
    fn handles_mutate_the_arena() {
        let doc = HeadlessDocument::from_html(r#"<body><div id="spacer" style="color: red"></div></body>"#);
        let spacer = doc.resolve(&ElementQuery::id("spacer")).pop().unwrap();
        spacer.set_height(80.0);
        spacer.add_class("x");
        spacer.add_class("x");
        assert!(spacer.has_class("x"));
        drop(spacer);

        let n = doc.find(&ElementQuery::id("spacer")).unwrap();
        assert_eq!(n.style_value("height"), Some("80px"));
        assert_eq!(n.style_value("color"), Some("red"));
        assert_eq!(n.classes, vec!["x".to_string()]);
    }

    #[test]
    fn fingerprint_tracks_state() {
        let doc = HeadlessDocument::from_html("<body><div id=a></div></body>");
        let before = doc.fingerprint().unwrap();
        assert_eq!(before.len(), 64);
        assert_eq!(before, doc.fingerprint().unwrap());
        for h in doc.resolve(&ElementQuery::tag("body")) {
            h.add_class("small-screen");
        }
        assert_ne!(before, doc.fingerprint().unwrap());
    }
}
