use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::errors::TransportError;
use super::form::ContactForm;

pub const CONTACT_PATH: &str = "/api/contact";

/// Delivers a contact form somewhere. Implemented over HTTP in production and
/// by stubs in tests.
#[async_trait]
pub trait ContactTransport: Send + Sync {
    async fn deliver(&self, form: &ContactForm) -> Result<(), TransportError>;
}

/// `POST {base_url}/api/contact` with the form as a JSON body.
#[derive(Debug, Clone)]
pub struct HttpContactTransport {
    client: Client,
    endpoint: String,
}

impl HttpContactTransport {
    /// The base URL is not validated; a missing or broken one surfaces as a
    /// transport error on the first delivery.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: contact_endpoint(base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ContactTransport for HttpContactTransport {
    async fn deliver(&self, form: &ContactForm) -> Result<(), TransportError> {
        debug!(endpoint = %self.endpoint, "Posting contact form");

        let response = self.client.post(&self.endpoint).json(form).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status(status.as_u16()))
        }
    }
}

pub fn contact_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), CONTACT_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_single_slash() {
        assert_eq!(
            contact_endpoint("https://api.example.com/"),
            "https://api.example.com/api/contact"
        );
        assert_eq!(
            contact_endpoint("https://api.example.com"),
            "https://api.example.com/api/contact"
        );
    }

    #[test]
    fn test_missing_base_url_is_not_rejected_up_front() {
        let transport = HttpContactTransport::new("");
        assert_eq!(transport.endpoint(), "/api/contact");
    }

    #[tokio::test]
    async fn test_relative_endpoint_fails_at_transport_layer() {
        let transport = HttpContactTransport::new("");
        let form = ContactForm::new("Ada", "ada@example.com", "", "Hi");
        let err = transport.deliver(&form).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
