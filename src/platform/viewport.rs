//! Viewport queries and a mutable emulated viewport for tests and the CLI

use std::sync::{Arc, Mutex};

use crate::Viewport;

/// Reports the current rendering width of the visible page area.
pub trait ViewportQuery: Send + Sync {
    /// Current viewport width in CSS pixels
    fn width(&self) -> f64;
}

impl ViewportQuery for Viewport {
    fn width(&self) -> f64 {
        f64::from(self.width)
    }
}

impl<T: ViewportQuery + ?Sized> ViewportQuery for Arc<T> {
    fn width(&self) -> f64 {
        (**self).width()
    }
}

impl<T: ViewportQuery + ?Sized> ViewportQuery for &T {
    fn width(&self) -> f64 {
        (**self).width()
    }
}

/// Viewport whose metrics can be changed at runtime, the way a window is
/// resized or a device is rotated.
pub struct EmulatedViewport {
    metrics: Mutex<Viewport>,
}

impl EmulatedViewport {
    pub fn new(viewport: Viewport) -> Self {
        EmulatedViewport {
            metrics: Mutex::new(viewport),
        }
    }

    /// Replace both dimensions.
    pub fn resize(&self, width: u32, height: u32) {
        let mut g = self.metrics.lock().unwrap_or_else(|e| e.into_inner());
        *g = Viewport { width, height };
    }

    /// Swap width and height, as an orientation change does.
    pub fn rotate(&self) {
        let mut g = self.metrics.lock().unwrap_or_else(|e| e.into_inner());
        *g = Viewport {
            width: g.height,
            height: g.width,
        };
    }

    pub fn metrics(&self) -> Viewport {
        *self.metrics.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for EmulatedViewport {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl ViewportQuery for EmulatedViewport {
    fn width(&self) -> f64 {
        f64::from(self.metrics().width)
    }
}
