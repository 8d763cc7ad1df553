use std::time::Duration;
use thiserror::Error;

use super::form::Field;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    EmptyField(Field),
    #[error("'{0}' is not a valid email address")]
    MalformedEmail(String),
}

/// Any way a delivery can fail. Every variant is treated the same by the
/// submission state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("contact endpoint responded with HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("submission abandoned before a response arrived")]
    Abandoned,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => TransportError::Status(status.as_u16()),
            None => TransportError::Network(err.to_string()),
        }
    }
}
