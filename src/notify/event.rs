//! Decoding of pushed frames.

use serde::Deserialize;
use serde_json::Value;

use crate::i18n::Messages;

/// Frame kinds understood by the client
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PushFrame {
    NewPost(NewPostFrame),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct NewPostFrame {
    #[serde(default)]
    post_id: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    vehicle: Option<Value>,
}

/// A pushed event worth showing to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    NewPost {
        post_id: Option<u64>,
        /// Name of the vehicle the post is about
        subject: Option<String>,
        title: Option<String>,
    },
}

impl NotificationEvent {
    /// Alert text for this event, falling back to localized defaults for
    /// missing parts
    pub fn message(&self, messages: &Messages) -> String {
        match self {
            NotificationEvent::NewPost { subject, title, .. } => format!(
                "{}: {} - {}",
                messages.new_post,
                subject.as_deref().unwrap_or(messages.default_vehicle),
                title.as_deref().unwrap_or(messages.default_post_title),
            ),
        }
    }
}

/// Decode one text frame.
///
/// An empty frame is treated as an empty object. Frames without a `type`, or
/// with a type the client does not know, decode to `Ok(None)`. Malformed JSON
/// is an error for the caller to log.
pub fn decode_frame(text: &str) -> Result<Option<NotificationEvent>, serde_json::Error> {
    let text = if text.trim().is_empty() { "{}" } else { text };
    let value: Value = serde_json::from_str(text)?;
    if value.get("type").is_none() {
        return Ok(None);
    }

    match serde_json::from_value::<PushFrame>(value)? {
        PushFrame::NewPost(frame) => Ok(Some(NotificationEvent::NewPost {
            post_id: frame.post_id.as_ref().and_then(Value::as_u64),
            // Only an object carrying a name counts as a vehicle
            subject: frame
                .vehicle
                .as_ref()
                .and_then(|v| v.get("name"))
                .and_then(non_empty),
            title: frame.title.as_ref().and_then(non_empty),
        })),
        PushFrame::Unknown => Ok(None),
    }
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
