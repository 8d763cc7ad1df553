// Scroll-driven section reveal
//
// Sections start hidden and are revealed exactly once, the first time they
// scroll into the (bottom-shrunk) viewport.

pub mod geometry;
pub mod header;
pub mod observer;
pub mod section;
pub mod store;

pub use geometry::{Intersection, Region, Viewport};
pub use header::ScrollHeader;
pub use observer::{
    ObservationUnavailable, ObserverError, ObserverOptions, TargetHandle, VisibilityEvent,
    VisibilityObserver,
};
pub use section::{RevealClasses, SectionReveal, FADE_UP, SLIDE_IN};
pub use store::{RevealStore, SectionKey};
