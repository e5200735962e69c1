//! A mock transport for testing dispatch without a network.

use deploy_notify::{TransportError, WebhookResponse, WebhookTransport};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentRequest {
    pub url: String,
    pub body: Vec<u8>,
}

impl SentRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Clone, Debug)]
pub struct MockTransport {
    pub sent: Arc<Mutex<Vec<SentRequest>>>,
    reply: Result<WebhookResponse, TransportError>,
}

impl MockTransport {
    pub fn responding(status: u16, body: &str) -> Self {
        Self {
            sent: Arc::default(),
            reply: Ok(WebhookResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            sent: Arc::default(),
            reply: Err(TransportError::Request(message.to_string())),
        }
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_request(&self) -> SentRequest {
        self.sent.lock().unwrap().last().cloned().expect("no request was sent")
    }
}

impl WebhookTransport for MockTransport {
    fn post_json(&self, url: &str, body: Vec<u8>) -> Result<WebhookResponse, TransportError> {
        self.sent.lock().unwrap().push(SentRequest {
            url: url.to_string(),
            body,
        });
        self.reply.clone()
    }
}
