//! Deployment events and the payload built from them.
//!
//! An [`InvocationInput`] mirrors the event document handed to the notifier.
//! Every field is optional. [`NotificationPayload::from_input`] applies the
//! per-field defaults and yields the exact body that goes out on the wire.

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Default for identifier fields (`ENV_NAME`, `PR_NUMBER`, `BRANCH_NAME`).
pub const UNKNOWN: &str = "unknown";
/// Default for `DEPLOY_STATUS`.
pub const DEFAULT_DEPLOY_STATUS: &str = "✅ 成功";
/// Timezone label appended to generated timestamps.
pub const DEFAULT_TIMESTAMP_LABEL: &str = "JST";
/// `strftime` pattern for generated timestamps, label excluded.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The event record received for one invocation.
///
/// A field that is absent or `null` is `None`. A present string, even an
/// empty one, is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct InvocationInput {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub env_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub pr_number: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub branch_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub genu_url: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub pr_url: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub deploy_status: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub deploy_timestamp: Option<String>,
}

impl InvocationInput {
    /// Parses an event document. The top level must be a JSON object.
    pub fn from_json(event: &str) -> serde_json::Result<Self> {
        match serde_json::from_str::<Value>(event)? {
            Value::Object(fields) => serde_json::from_value(Value::Object(fields)),
            other => Err(serde::de::Error::custom(format!(
                "expected an object, found {}",
                kind_of(&other)
            ))),
        }
    }
}

/// Accepts strings, numbers and booleans. CI systems often send `PR_NUMBER`
/// as a bare integer.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, number or boolean, found {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The JSON body posted to the webhook.
///
/// Field order is the wire key order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct NotificationPayload {
    pub env_name: String,
    pub pr_number: String,
    pub branch_name: String,
    pub genu_url: String,
    pub pr_url: String,
    pub deploy_status: String,
    pub deploy_timestamp: String,
}

impl NotificationPayload {
    /// Builds the payload, filling absent fields with their defaults.
    ///
    /// The timestamp is only generated when the input carries none.
    pub fn from_input(input: InvocationInput, timestamp_label: &str) -> Self {
        let unknown = || UNKNOWN.to_string();
        Self {
            env_name: input.env_name.unwrap_or_else(unknown),
            pr_number: input.pr_number.unwrap_or_else(unknown),
            branch_name: input.branch_name.unwrap_or_else(unknown),
            genu_url: input.genu_url.unwrap_or_default(),
            pr_url: input.pr_url.unwrap_or_default(),
            deploy_status: input
                .deploy_status
                .unwrap_or_else(|| DEFAULT_DEPLOY_STATUS.to_string()),
            deploy_timestamp: input
                .deploy_timestamp
                .unwrap_or_else(|| current_timestamp(timestamp_label)),
        }
    }

    /// Serializes the payload to UTF-8 JSON bytes.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Local wall-clock time, e.g. `2025-07-08 12:00:00 JST`.
pub fn current_timestamp(label: &str) -> String {
    let now = Local::now().format(TIMESTAMP_FORMAT);
    if label.is_empty() {
        now.to_string()
    } else {
        format!("{} {}", now, label)
    }
}
