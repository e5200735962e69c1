/// deploy-notify - Posts deployment events to a Slack incoming webhook
///
/// The entry point is [`NotificationDispatcher`]: hand it an
/// [`InvocationInput`] and it returns an [`InvocationResult`] carrying a
/// status code and a JSON body.
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod telemetry;
pub mod transport;

// Re-export core types for convenience
pub use config::Config;
pub use dispatcher::{InvocationResult, NotificationDispatcher};
pub use error::{NotifyError, TransportError};
pub use event::{InvocationInput, NotificationPayload};
pub use transport::{HttpTransport, WebhookResponse, WebhookTransport};
