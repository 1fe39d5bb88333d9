//! Inline style parsing and vertical box metrics.
//!
//! Declarations are tokenized with `cssparser`; only `px` dimensions and
//! unitless zero resolve to lengths. Anything else (other units, `auto`,
//! bare numbers) is treated as unresolved.

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

const BORDER_STYLES: [&str; 10] = [
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

/// `medium`, the initial border width
const MEDIUM_BORDER: f64 = 3.0;

/// Parse a `style` attribute into `(property, value)` pairs in source order.
///
/// Property names are lowercased, `!important` is dropped and malformed
/// declarations are skipped up to the next `;`.
pub fn parse_declarations(style: &str) -> Vec<(String, String)> {
    let mut input = ParserInput::new(style);
    let mut parser = Parser::new(&mut input);
    let mut decls = Vec::new();

    while !parser.is_exhausted() {
        match parser.parse_until_after(Delimiter::Semicolon, parse_declaration) {
            Ok((name, value)) if !value.is_empty() => decls.push((name, value)),
            Ok(_) => {}
            Err(e) => log::trace!("skipping inline declaration: {:?}", e.kind),
        }
    }
    decls
}

fn parse_declaration<'i>(p: &mut Parser<'i, '_>) -> Result<(String, String), ParseError<'i, ()>> {
    let name = p.expect_ident()?.to_ascii_lowercase();
    p.expect_colon()?;

    let start = p.position();
    let mut end = start;
    while let Ok(token) = p.next() {
        if matches!(token, Token::Delim('!')) {
            break;
        }
        end = p.position();
    }
    Ok((name, p.slice(start..end).trim().to_string()))
}

#[derive(Debug, Clone, PartialEq)]
enum Component {
    Length(f64),
    Ident(String),
    Other,
}

fn components(value: &str) -> Vec<Component> {
    let mut input = ParserInput::new(value);
    let mut p = Parser::new(&mut input);
    let mut out = Vec::new();
    while let Ok(token) = p.next() {
        out.push(match token {
            Token::Dimension { value, unit, .. } if unit.eq_ignore_ascii_case("px") => {
                Component::Length(f64::from(*value))
            }
            Token::Number { value, .. } if *value == 0.0 => Component::Length(0.0),
            Token::Ident(name) => Component::Ident(name.to_ascii_lowercase()),
            _ => Component::Other,
        });
    }
    out
}

/// A single resolvable length, e.g. `80px` or `0`
pub fn length(value: &str) -> Option<f64> {
    match components(value).as_slice() {
        [Component::Length(v)] => Some(*v),
        _ => None,
    }
}

fn keyword(value: &str) -> Option<String> {
    match components(value).as_slice() {
        [Component::Ident(k)] => Some(k.clone()),
        _ => None,
    }
}

/// Top and bottom out of a 1-4 value box shorthand
fn vertical<T: Clone>(vals: &[T]) -> Option<(T, T)> {
    match vals {
        [all] | [all, _] => Some((all.clone(), all.clone())),
        [top, _, bottom] | [top, _, bottom, _] => Some((top.clone(), bottom.clone())),
        _ => None,
    }
}

fn border_width_of(c: &Component) -> Option<f64> {
    match c {
        Component::Length(v) => Some(*v),
        Component::Ident(k) => match k.as_str() {
            "thin" => Some(1.0),
            "medium" => Some(MEDIUM_BORDER),
            "thick" => Some(5.0),
            _ => None,
        },
        Component::Other => None,
    }
}

fn border_style_of(c: &Component) -> Option<String> {
    match c {
        Component::Ident(k) if BORDER_STYLES.contains(&k.as_str()) => Some(k.clone()),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
struct BorderSide {
    width: Option<f64>,
    style: Option<String>,
}

impl BorderSide {
    /// `border` / `border-top` shorthands reset omitted parts to initial values.
    fn from_shorthand(value: &str) -> Self {
        let parts = components(value);
        BorderSide {
            width: parts.iter().find_map(border_width_of),
            style: parts.iter().find_map(border_style_of),
        }
    }

    /// Used width: zero unless a visible style is set.
    fn used_width(&self) -> f64 {
        match self.style.as_deref() {
            None | Some("none") | Some("hidden") => 0.0,
            Some(_) => self.width.unwrap_or(MEDIUM_BORDER),
        }
    }
}

fn padding(decls: &[(String, String)]) -> (f64, f64) {
    let (mut top, mut bottom) = (0.0, 0.0);
    for (prop, value) in decls {
        match prop.as_str() {
            "padding" => {
                let vals: Vec<f64> = components(value)
                    .iter()
                    .map(|c| match c {
                        Component::Length(v) => *v,
                        _ => 0.0,
                    })
                    .collect();
                if let Some((t, b)) = vertical(&vals) {
                    (top, bottom) = (t, b);
                }
            }
            "padding-top" => top = length(value).unwrap_or(0.0),
            "padding-bottom" => bottom = length(value).unwrap_or(0.0),
            _ => {}
        }
    }
    (top, bottom)
}

fn borders(decls: &[(String, String)]) -> (f64, f64) {
    let (mut top, mut bottom) = (BorderSide::default(), BorderSide::default());
    for (prop, value) in decls {
        match prop.as_str() {
            "border" => {
                top = BorderSide::from_shorthand(value);
                bottom = top.clone();
            }
            "border-top" => top = BorderSide::from_shorthand(value),
            "border-bottom" => bottom = BorderSide::from_shorthand(value),
            "border-width" => {
                let widths: Vec<Option<f64>> = components(value).iter().map(border_width_of).collect();
                if let Some((t, b)) = vertical(&widths) {
                    (top.width, bottom.width) = (t, b);
                }
            }
            "border-top-width" => top.width = components(value).first().and_then(border_width_of),
            "border-bottom-width" => bottom.width = components(value).first().and_then(border_width_of),
            "border-style" => {
                let styles: Vec<Option<String>> = components(value).iter().map(border_style_of).collect();
                if let Some((t, b)) = vertical(&styles) {
                    (top.style, bottom.style) = (t, b);
                }
            }
            "border-top-style" => top.style = keyword(value).filter(|k| BORDER_STYLES.contains(&k.as_str())),
            "border-bottom-style" => bottom.style = keyword(value).filter(|k| BORDER_STYLES.contains(&k.as_str())),
            _ => {}
        }
    }
    (top.used_width(), bottom.used_width())
}

/// Height plus vertical padding and border; `height` alone under
/// `box-sizing: border-box`.
pub fn outer_height(decls: &[(String, String)]) -> f64 {
    let last = |property: &str| {
        decls
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    };

    let height = last("height").and_then(length).unwrap_or(0.0);
    if last("box-sizing").and_then(keyword).as_deref() == Some("border-box") {
        return height;
    }
    let (pad_top, pad_bottom) = padding(decls);
    let (border_top, border_bottom) = borders(decls);
    height + pad_top + pad_bottom + border_top + border_bottom
}
