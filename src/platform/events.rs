//! Host event kinds and a synchronous dispatcher

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

type EventHandler = Arc<dyn Fn(EventKind) + Send + Sync>;

/// Notifications a layout host delivers. None of them carry a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The document finished loading
    Ready,
    /// The window was resized
    Resize,
    /// The device orientation changed
    #[serde(rename = "orientationchange")]
    OrientationChange,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Ready, EventKind::Resize, EventKind::OrientationChange];

    /// DOM event name
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Ready => "ready",
            EventKind::Resize => "resize",
            EventKind::OrientationChange => "orientationchange",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs registered handlers in the caller's thread, in registration order.
///
/// Each dispatch runs every handler to completion before returning; rapid
/// successive events are neither coalesced nor debounced.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<EventKind, Vec<EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind
    pub fn on<F>(&mut self, kind: EventKind, cb: F)
    where
        F: Fn(EventKind) + Send + Sync + 'static,
    {
        self.handlers.entry(kind).or_default().push(Arc::new(cb));
    }

    /// Remove every handler registered for `kind`
    pub fn clear(&mut self, kind: EventKind) {
        self.handlers.remove(&kind);
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver `kind` to its handlers and return how many ran.
    pub fn dispatch(&self, kind: EventKind) -> usize {
        let Some(handlers) = self.handlers.get(&kind) else {
            log::trace!("no handlers for {}", kind);
            return 0;
        };
        log::trace!("dispatching {} to {} handler(s)", kind, handlers.len());
        for h in handlers {
            h(kind);
        }
        handlers.len()
    }
}
