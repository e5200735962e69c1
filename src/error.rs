use serde::Serialize;
use thiserror::Error;

/// Why an invocation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("SLACK_WEBHOOK_URL environment variable not set")]
    ConfigurationMissing,

    #[error("Slack API returned status {status}")]
    UpstreamRejected { status: u16, response: String },

    #[error("Failed to send Slack notification: {0}")]
    Transport(String),

    #[error("Invalid event payload: {0}")]
    InvalidEvent(String),
}

/// Failure reported by a [`crate::transport::WebhookTransport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("{0}")]
    Request(String),

    #[error("response body is not valid UTF-8: {0}")]
    Decode(String),

    #[error("failed to serialize payload: {0}")]
    Serialize(String),
}

impl From<TransportError> for NotifyError {
    fn from(err: TransportError) -> Self {
        NotifyError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Request(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<&'a str>,
}

impl NotifyError {
    /// The status code reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            NotifyError::ConfigurationMissing | NotifyError::Transport(_) => 500,
            NotifyError::UpstreamRejected { status, .. } => *status,
            NotifyError::InvalidEvent(_) => 400,
        }
    }

    /// Renders the JSON error body returned to the caller.
    pub fn to_body(&self) -> String {
        let response = match self {
            NotifyError::UpstreamRejected { response, .. } => Some(response.as_str()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            response,
        };
        // A struct of strings always serializes.
        serde_json::to_string(&body).unwrap_or_default()
    }
}
