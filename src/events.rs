//! The closed set of event payloads carried over the bus.
//!
//! Dispatch is on the topic string (bus side), but each payload is a
//! variant of a single tagged enum rather than an `Any`-style blob, so
//! handlers pattern-match a sealed shape instead of downcasting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chat turn has started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStartedPayload {
    /// The user's message.
    pub message: String,
}

/// A chat turn completed (successfully or with an error).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponsePayload {
    /// The user's message.
    pub message: String,
    /// The assistant's response.
    pub response: String,
    /// Opaque error detail, present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// A tool finished executing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecutedPayload {
    /// Identifier correlating this execution with its request.
    pub execution_id: String,
    /// The tool's name, e.g. `"readFile"` or `"TodoWrite"`.
    pub tool_name: String,
    /// The parameters the tool was invoked with.
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
    /// The tool's result.
    #[serde(default)]
    pub result: HashMap<String, Value>,
    /// Optional human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A tool is asking the user to confirm before running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfirmationRequestPayload {
    /// Identifier correlating this request with its response.
    pub execution_id: String,
    /// The tool's name.
    pub tool_name: String,
    /// The command the tool would run.
    pub command: String,
    /// Human-readable prompt.
    pub message: String,
}

/// The user's answer to a [`ToolConfirmationRequestPayload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfirmationResponsePayload {
    /// Identifier correlating this response with its request.
    pub execution_id: String,
    /// Whether the user confirmed.
    pub confirmed: bool,
}

/// A generic user confirmation request (diff, plan, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfirmationRequestPayload {
    /// Identifier correlating this request with its response.
    pub execution_id: String,
    /// Short title for the confirmation prompt.
    pub title: String,
    /// The content being confirmed.
    pub content: String,
    /// The kind of content, e.g. `"diff"` or `"plan"`.
    pub content_type: String,
    /// File path the content relates to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Human-readable prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Label for the confirm action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_text: Option<String>,
    /// Label for the cancel action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_text: Option<String>,
}

/// The user's answer to a [`UserConfirmationRequestPayload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfirmationResponsePayload {
    /// Identifier correlating this response with its request.
    pub execution_id: String,
    /// Whether the user confirmed.
    pub confirmed: bool,
}

/// A notification for the chat surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatNotificationPayload {
    /// The notification text.
    pub message: String,
    /// Opaque error detail, if this notification reports a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// A transient status line describing a tool call in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallMessagePayload {
    /// The tool's name.
    pub tool_name: String,
    /// The status text.
    pub message: String,
}

/// The closed set of payloads carried over the bus, one variant per topic.
///
/// `#[non_exhaustive]` keeps room to add topics without a semver break,
/// while still forcing exhaustive-by-default matching on the variants
/// that exist today, per the "tagged enum, not runtime introspection"
/// dispatch rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(tag = "topic", content = "payload")]
pub enum Event {
    /// Topic `chat.started`.
    #[serde(rename = "chat.started")]
    ChatStarted(ChatStartedPayload),
    /// Topic `chat.response`.
    #[serde(rename = "chat.response")]
    ChatResponse(ChatResponsePayload),
    /// Topic `tool.executed`.
    #[serde(rename = "tool.executed")]
    ToolExecuted(ToolExecutedPayload),
    /// Topic `tool.confirmation.request`. Not consumed by this core.
    #[serde(rename = "tool.confirmation.request")]
    ToolConfirmationRequest(ToolConfirmationRequestPayload),
    /// Topic `tool.confirmation.response`. Not consumed by this core.
    #[serde(rename = "tool.confirmation.response")]
    ToolConfirmationResponse(ToolConfirmationResponsePayload),
    /// Topic `user.confirmation.request`. Not consumed by this core.
    #[serde(rename = "user.confirmation.request")]
    UserConfirmationRequest(UserConfirmationRequestPayload),
    /// Topic `user.confirmation.response`. Not consumed by this core.
    #[serde(rename = "user.confirmation.response")]
    UserConfirmationResponse(UserConfirmationResponsePayload),
    /// Topic `chat.notification`. Not consumed by this core.
    #[serde(rename = "chat.notification")]
    ChatNotification(ChatNotificationPayload),
    /// Topic `tool.call.message`. Not consumed by this core.
    #[serde(rename = "tool.call.message")]
    ToolCallMessage(ToolCallMessagePayload),
}

impl Event {
    /// The canonical wire topic name for this event's variant.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::ChatStarted(_) => "chat.started",
            Self::ChatResponse(_) => "chat.response",
            Self::ToolExecuted(_) => "tool.executed",
            Self::ToolConfirmationRequest(_) => "tool.confirmation.request",
            Self::ToolConfirmationResponse(_) => "tool.confirmation.response",
            Self::UserConfirmationRequest(_) => "user.confirmation.request",
            Self::UserConfirmationResponse(_) => "user.confirmation.response",
            Self::ChatNotification(_) => "chat.notification",
            Self::ToolCallMessage(_) => "tool.call.message",
        }
    }
}
