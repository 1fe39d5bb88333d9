//! Platform capabilities the synchronizer is driven through.
//!
//! The host environment (a browser binding, the in-memory
//! [`HeadlessDocument`](crate::document::HeadlessDocument), or a test double)
//! provides a viewport width, a way to resolve elements, and an event source.

pub mod element;
pub mod events;
pub mod viewport;

pub use element::{ElementHandle, ElementQuery, ElementRegistry};
pub use events::{EventDispatcher, EventKind};
pub use viewport::{EmulatedViewport, ViewportQuery};

/// Composite of the two capabilities a layout host must offer.
///
/// Blanket-implemented for anything that is both a viewport and a registry,
/// so a single host object can be handed to the synchronizer twice.
pub trait LayoutHost: ViewportQuery + ElementRegistry {}

impl<T: ViewportQuery + ElementRegistry + ?Sized> LayoutHost for T {}
