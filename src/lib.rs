// Folio Library - reveal and contact core of a single-page portfolio
// This exposes the core components for testing and integration

pub mod config;
pub mod contact;
pub mod effects;
pub mod reveal;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{config, FolioConfig};
pub use contact::{
    ContactController, ContactForm, ContactTransport, Field, HttpContactTransport,
    SubmissionPhase, SubmissionSettings, SubmitOutcome, TransportError, ValidationError,
};
pub use effects::{AnimationLoop, CursorTrail, DetailModal, OverlayHost, ScrollLock};
pub use reveal::{
    ObserverError, ObserverOptions, Region, RevealStore, ScrollHeader, SectionKey, SectionReveal,
    Viewport, VisibilityEvent, VisibilityObserver,
};
pub use telemetry::{generate_correlation_id, init_telemetry, submission_span};
