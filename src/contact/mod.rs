// Contact form submission
//
// A single-flight state machine in front of an outbound JSON POST. Transport
// is a trait so tests and the CLI can swap the HTTP client for stubs.

pub mod controller;
pub mod errors;
pub mod form;
pub mod state_machine;
pub mod transport;

pub use controller::{
    ContactController, IgnoredReason, SubmissionSettings, SubmitOutcome, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_RESET_DELAY,
};
pub use errors::{TransportError, ValidationError};
pub use form::{ContactForm, Field};
pub use state_machine::{SubmissionEvent, SubmissionMachine, SubmissionPhase};
pub use transport::{contact_endpoint, ContactTransport, HttpContactTransport, CONTACT_PATH};
