//! The layout synchronizer.
//!
//! On every trigger the synchronizer toggles the breakpoint marker class on
//! the content container and copies the floating header's outer height onto
//! the spacer below it. It holds no state between calls.

use std::sync::Arc;

use crate::platform::{ElementQuery, ElementRegistry, EventDispatcher, EventKind, LayoutHost, ViewportQuery};
use crate::LayoutConfig;

/// Viewport classification against the breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenClass {
    Small,
    Normal,
}

/// `Small` iff `width < breakpoint`; the breakpoint itself is `Normal`.
pub fn classify(width: f64, breakpoint: f64) -> ScreenClass {
    if width < breakpoint {
        ScreenClass::Small
    } else {
        ScreenClass::Normal
    }
}

pub struct LayoutSynchronizer<V, R> {
    config: LayoutConfig,
    viewport: V,
    registry: R,
    header: ElementQuery,
    spacer: ElementQuery,
}

impl<H: LayoutHost> LayoutSynchronizer<Arc<H>, Arc<H>> {
    /// Drive a single host object that is both viewport and registry.
    pub fn for_host(config: LayoutConfig, host: Arc<H>) -> Self {
        Self::new(config, host.clone(), host)
    }
}

impl<V: ViewportQuery, R: ElementRegistry> LayoutSynchronizer<V, R> {
    pub fn new(config: LayoutConfig, viewport: V, registry: R) -> Self {
        let header = ElementQuery::id(config.header_id.clone());
        let spacer = ElementQuery::id(config.spacer_id.clone());
        LayoutSynchronizer {
            config,
            viewport,
            registry,
            header,
            spacer,
        }
    }

    /// Apply both adjustments against the current host state.
    ///
    /// Missing elements are skipped silently; there is nothing to report.
    pub fn synchronize(&self) {
        let width = self.viewport.width();
        let class = classify(width, self.config.breakpoint);
        self.apply_marker(class);
        self.size_spacer();
        log::debug!("synchronized layout: width={} class={:?}", width, class);
    }

    fn apply_marker(&self, class: ScreenClass) {
        let marker = self.config.marker_class.as_str();
        let containers = self.registry.resolve(&self.config.container);
        if containers.is_empty() {
            log::debug!("content container {} not found", self.config.container);
        }
        for el in containers {
            match class {
                ScreenClass::Small => el.add_class(marker),
                ScreenClass::Normal => el.remove_class(marker),
            }
        }
    }

    fn size_spacer(&self) {
        // The first matched header decides the height, like a jQuery getter.
        let Some(height) = self
            .registry
            .resolve(&self.header)
            .first()
            .map(|h| h.outer_height())
        else {
            log::debug!("header {} not found; spacer left unchanged", self.header);
            return;
        };
        let height = height.max(0.0);

        let spacers = self.registry.resolve(&self.spacer);
        if spacers.is_empty() {
            log::debug!("spacer {} not found", self.spacer);
            return;
        }
        for el in spacers {
            el.set_height(height);
        }
        log::trace!("spacer {} sized to {}px", self.spacer, height);
    }
}

impl<V, R> LayoutSynchronizer<V, R>
where
    V: ViewportQuery + 'static,
    R: ElementRegistry + 'static,
{
    /// Register `synchronize` for ready, resize and orientation change.
    pub fn bind(this: Arc<Self>, dispatcher: &mut EventDispatcher) {
        for kind in EventKind::ALL {
            let sync = this.clone();
            dispatcher.on(kind, move |k| {
                log::trace!("{} received", k);
                sync.synchronize();
            });
        }
    }
}
