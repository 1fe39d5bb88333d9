//! RFox Layout Synchronizer
//!
//! Keeps a page's responsive layout in step with its viewport: a marker class
//! on the content container tracks whether the viewport is below a width
//! breakpoint, and a spacer element is kept exactly as tall as the floating
//! header above it so content is never hidden underneath.
//!
//! The synchronizer is driven through injected capabilities
//! ([`platform::ViewportQuery`], [`platform::ElementRegistry`]) and re-runs on
//! every ready, resize and orientation-change event.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rflayout::document::HeadlessDocument;
//! use rflayout::platform::{EmulatedViewport, EventDispatcher, EventKind};
//! use rflayout::{LayoutConfig, LayoutSynchronizer, Viewport};
//!
//! let doc = Arc::new(HeadlessDocument::from_html(
//!     r#"<body><div id="title-bar" style="height: 80px"></div><div id="title-buffer"></div></body>"#,
//! ));
//! let viewport = Arc::new(EmulatedViewport::new(Viewport { width: 500, height: 800 }));
//! let sync = Arc::new(LayoutSynchronizer::new(LayoutConfig::default(), viewport, doc.clone()));
//!
//! let mut events = EventDispatcher::new();
//! LayoutSynchronizer::bind(sync, &mut events);
//! events.dispatch(EventKind::Ready);
//!
//! let spacer = doc.find(&rflayout::platform::ElementQuery::id("title-buffer")).unwrap();
//! assert_eq!(spacer.style_value("height"), Some("80px"));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

// In-memory document host backed by scraper
pub mod document;

// Logger bootstrap for binaries
pub mod logging;

// Injected capabilities: viewport, element registry, event dispatch
pub mod platform;

// Inline style declarations and box metrics
pub mod style;

pub mod sync;
pub use sync::{classify, LayoutSynchronizer, ScreenClass};

use platform::ElementQuery;

/// Viewport width below which the layout is considered small, in CSS px
pub const DEFAULT_BREAKPOINT: f64 = 700.0;

/// Configuration for the layout synchronizer
///
/// Every field has a default, so a partial JSON document is a valid
/// configuration:
///
/// ```
/// let cfg = rflayout::LayoutConfig::from_json_str(r#"{ "breakpoint": 960 }"#).unwrap();
/// assert_eq!(cfg.breakpoint, 960.0);
/// assert_eq!(cfg.marker_class, "small-screen");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Width breakpoint; widths strictly below it are "small"
    pub breakpoint: f64,
    /// Class toggled on the content container for small viewports
    pub marker_class: String,
    /// The content container receiving the marker class
    pub container: ElementQuery,
    /// Id of the floating header whose height is measured
    pub header_id: String,
    /// Id of the spacer sized to match the header
    pub spacer_id: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            breakpoint: DEFAULT_BREAKPOINT,
            marker_class: "small-screen".to_string(),
            container: ElementQuery::tag("body"),
            header_id: "title-bar".to_string(),
            spacer_id: "title-buffer".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: LayoutConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.breakpoint.is_finite() || self.breakpoint < 0.0 {
            return Err(Error::ConfigError(format!(
                "breakpoint must be a finite, non-negative width (got {})",
                self.breakpoint
            )));
        }
        if self.marker_class.is_empty() || self.marker_class.chars().any(char::is_whitespace) {
            return Err(Error::ConfigError(format!(
                "marker_class must be a single class name (got {:?})",
                self.marker_class
            )));
        }
        for (field, id) in [("header_id", &self.header_id), ("spacer_id", &self.spacer_id)] {
            if id.trim().is_empty() {
                return Err(Error::ConfigError(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}

/// Viewport dimensions in CSS px
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.breakpoint, 700.0);
        assert_eq!(config.marker_class, "small-screen");
        assert_eq!(config.container, ElementQuery::tag("body"));
        assert_eq!(config.header_id, "title-bar");
        assert_eq!(config.spacer_id, "title-buffer");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.width, 1280);
        assert_eq!(viewport.height, 720);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = LayoutConfig::from_json_str(r##"{ "container": "#content", "marker_class": "narrow" }"##).unwrap();
        assert_eq!(cfg.container, ElementQuery::id("content"));
        assert_eq!(cfg.marker_class, "narrow");
        assert_eq!(cfg.breakpoint, DEFAULT_BREAKPOINT);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        for json in [
            r#"{ "breakpoint": -1 }"#,
            r#"{ "marker_class": "two words" }"#,
            r#"{ "marker_class": "" }"#,
            r#"{ "spacer_id": " " }"#,
        ] {
            let err = LayoutConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, Error::ConfigError(_)), "{} gave {:?}", json, err);
        }
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        assert!(matches!(LayoutConfig::from_json_str("{"), Err(Error::Serde(_))));
        assert!(matches!(
            LayoutConfig::from_json_str(r#"{ "unknown": 1 }"#),
            Err(Error::Serde(_))
        ));
        // Selector problems surface while deserializing
        let err = LayoutConfig::from_json_str(r#"{ "container": "div p" }"#).unwrap_err();
        assert!(err.to_string().contains("unsupported selector"), "{}", err);
    }
}
