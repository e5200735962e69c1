//! Outbound HTTP delivery.

use crate::error::TransportError;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

/// The raw outcome of a POST that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl WebhookResponse {
    /// Decodes the body as UTF-8.
    pub fn text(&self) -> Result<String, TransportError> {
        String::from_utf8(self.body.clone()).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// A trait for clients that can deliver a JSON body to a webhook.
pub trait WebhookTransport: Send + Sync {
    /// Sends one POST with `Content-Type: application/json`.
    ///
    /// Any status code is a successful delivery at this layer. Only failures to
    /// obtain a response are errors.
    fn post_json(&self, url: &str, body: Vec<u8>) -> Result<WebhookResponse, TransportError>;
}

/// A blocking `reqwest` client. Timeouts and redirects use the client defaults.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a new `HttpTransport`.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client })
    }
}

impl WebhookTransport for HttpTransport {
    #[instrument(skip(self, url, body), fields(bytes = body.len()))]
    fn post_json(&self, url: &str, body: Vec<u8>) -> Result<WebhookResponse, TransportError> {
        let res = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        let status = res.status().as_u16();
        let body = res.bytes()?.to_vec();
        debug!(status, "Webhook responded");
        Ok(WebhookResponse { status, body })
    }
}
