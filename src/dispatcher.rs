//! Turns one deployment event into one webhook delivery.

use crate::config::Config;
use crate::error::{NotifyError, TransportError};
use crate::event::{InvocationInput, NotificationPayload, DEFAULT_TIMESTAMP_LABEL};
use crate::transport::{HttpTransport, WebhookTransport};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

pub const SUCCESS_MESSAGE: &str = "Slack notification sent successfully";

/// What the caller gets back from an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub status_code: u16,
    /// A JSON document, kept as text.
    pub body: String,
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Parses [`Self::body`].
    pub fn body_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

impl From<NotifyError> for InvocationResult {
    fn from(err: NotifyError) -> Self {
        Self {
            status_code: err.status_code(),
            body: err.to_body(),
        }
    }
}

#[derive(Serialize)]
struct SuccessBody<'a> {
    message: &'a str,
    payload: &'a NotificationPayload,
}

/// Sends deployment notifications to a single webhook.
pub struct NotificationDispatcher<T = HttpTransport> {
    webhook_url: Option<String>,
    timestamp_label: String,
    transport: T,
}

impl NotificationDispatcher<HttpTransport> {
    /// Builds a dispatcher backed by the blocking HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, NotifyError> {
        let transport = HttpTransport::new()?;
        Ok(Self::new(config.webhook_url.clone(), transport)
            .with_timestamp_label(config.timestamp_label.clone()))
    }
}

impl<T: WebhookTransport> NotificationDispatcher<T> {
    /// Creates a dispatcher for `webhook_url`.
    ///
    /// A `None`, empty or whitespace-only URL leaves the dispatcher
    /// unconfigured: every dispatch fails with
    /// [`NotifyError::ConfigurationMissing`] and nothing is sent.
    pub fn new(webhook_url: Option<String>, transport: T) -> Self {
        Self {
            webhook_url,
            timestamp_label: DEFAULT_TIMESTAMP_LABEL.to_string(),
            transport,
        }
    }

    /// Overrides the label appended to generated timestamps.
    pub fn with_timestamp_label(mut self, label: impl Into<String>) -> Self {
        self.timestamp_label = label.into();
        self
    }

    /// Delivers the event and reports the outcome as a status code and body.
    pub fn dispatch(&self, input: InvocationInput) -> InvocationResult {
        match self.try_dispatch(input) {
            Ok(payload) => {
                let body = SuccessBody {
                    message: SUCCESS_MESSAGE,
                    payload: &payload,
                };
                match serde_json::to_string(&body) {
                    Ok(body) => InvocationResult {
                        status_code: 200,
                        body,
                    },
                    Err(e) => NotifyError::from(TransportError::Serialize(e.to_string())).into(),
                }
            }
            Err(err) => err.into(),
        }
    }

    /// Decodes an event document, then dispatches it.
    pub fn dispatch_json(&self, event: &str) -> InvocationResult {
        match InvocationInput::from_json(event) {
            Ok(input) => self.dispatch(input),
            Err(e) => {
                warn!(error = %e, "Rejected malformed event");
                NotifyError::InvalidEvent(e.to_string()).into()
            }
        }
    }

    /// Delivers the event, returning the payload that was accepted upstream.
    #[instrument(skip_all)]
    pub fn try_dispatch(&self, input: InvocationInput) -> Result<NotificationPayload, NotifyError> {
        let url = match self.webhook_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => {
                error!("Webhook URL is not configured");
                return Err(NotifyError::ConfigurationMissing);
            }
        };

        let payload = NotificationPayload::from_input(input, &self.timestamp_label);

        match self.send(url, &payload) {
            Ok(()) => {
                info!(env = %payload.env_name, pr = %payload.pr_number, "Sent deployment notification");
                Ok(payload)
            }
            Err(NotifyError::Transport(message)) => {
                error!(error = %message, "Error sending Slack notification");
                Err(NotifyError::Transport(message))
            }
            Err(err) => Err(err),
        }
    }

    fn send(&self, url: &str, payload: &NotificationPayload) -> Result<(), NotifyError> {
        let body = payload
            .to_json_bytes()
            .map_err(|e| TransportError::Serialize(e.to_string()))?;
        let res = self.transport.post_json(url, body)?;

        if res.status == 200 {
            return Ok(());
        }

        let response = res.text()?;
        warn!(status = res.status, body = %response, "Webhook rejected notification");
        Err(NotifyError::UpstreamRejected {
            status: res.status,
            response,
        })
    }
}
