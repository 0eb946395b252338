//! Message types shared by the store client and the UI.
//!
//! A [`MessageBody`] is what travels over the wire; a [`Message`] is a body the
//! store has acknowledged, so it always carries the store-assigned id.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::warn;

/// Message fields as stored under an opaque key. There is no `id` in here.
/// Missing fields read as empty strings; the store accepts anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageBody {
    pub username: String,
    pub content: String,
    pub timestamp: String, // RFC3339 UTC, set by the client
}

impl MessageBody {
    /// Build a body from raw form input, stamped with the current time.
    /// Returns `None` when either field is blank after trimming.
    pub fn compose(username: &str, content: &str) -> Option<Self> {
        let username = username.trim();
        let content = content.trim();
        if username.is_empty() || content.is_empty() {
            return None;
        }

        Some(Self {
            username: username.to_string(),
            content: content.to_string(),
            timestamp: now_timestamp(),
        })
    }
}

/// A message known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub username: String,
    pub content: String,
    pub timestamp: String,
}

impl Message {
    pub fn from_body(id: impl Into<String>, body: MessageBody) -> Self {
        Self {
            id: id.into(),
            username: body.username,
            content: body.content,
            timestamp: body.timestamp,
        }
    }

    /// Timestamp formatted for the message list. Falls back to the raw string
    /// when the store holds something that isn't RFC3339.
    pub fn display_timestamp(&self) -> String {
        format_display_timestamp(&self.timestamp)
    }
}

/// Project the store's `key -> body` object into messages, keeping key order.
/// `None` (the store's `null`) means there are no messages yet. Entries that
/// aren't message objects at all are skipped so one bad write can't hide the
/// rest of the board.
pub fn project_collection(data: Option<Map<String, Value>>) -> Vec<Message> {
    let Some(entries) = data else {
        return Vec::new();
    };

    entries
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<MessageBody>(value) {
            Ok(body) => Some(Message::from_body(key, body)),
            Err(e) => {
                warn!(key = %key, error = %e, "skipping malformed message entry");
                None
            }
        })
        .collect()
}

/// Current instant in UTC, millisecond precision (e.g. "2025-11-02T12:34:56.789Z").
pub fn now_timestamp() -> String {
    let iso = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    OffsetDateTime::now_utc()
        .format(iso)
        .unwrap_or_default()
}

fn format_display_timestamp(raw: &str) -> String {
    let display = format_description!("[day]/[month]/[year], [hour]:[minute]:[second]");
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|ts| ts.format(display).ok())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Option<Map<String, Value>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_project_null_is_empty() {
        let messages = project_collection(as_map(Value::Null));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_project_single_entry() {
        let data = as_map(json!({
            "k1": { "username": "a", "content": "hi", "timestamp": "T" }
        }));
        let messages = project_collection(data);
        assert_eq!(
            messages,
            vec![Message {
                id: "k1".to_string(),
                username: "a".to_string(),
                content: "hi".to_string(),
                timestamp: "T".to_string(),
            }]
        );
    }

    #[test]
    fn test_project_keeps_store_order() {
        let raw = r#"{
            "-Nz9": {"username": "c", "content": "3", "timestamp": "T3"},
            "-Na1": {"username": "a", "content": "1", "timestamp": "T1"},
            "-Nm5": {"username": "b", "content": "2", "timestamp": "T2"}
        }"#;
        let data: Option<Map<String, Value>> = serde_json::from_str(raw).unwrap();
        let ids: Vec<String> = project_collection(data)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["-Nz9", "-Na1", "-Nm5"]);
    }

    #[test]
    fn test_project_keeps_partial_entries() {
        let data = as_map(json!({
            "k1": { "username": "a", "content": "hi", "timestamp": "T" },
            "k2": { "username": "b", "content": "yo" }
        }));
        let messages = project_collection(data);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "k1");
        assert_eq!(messages[1].id, "k2");
        assert_eq!(messages[1].username, "b");
        assert_eq!(messages[1].content, "yo");
        assert_eq!(messages[1].timestamp, "");
    }

    #[test]
    fn test_project_skips_non_object_entries() {
        let data = as_map(json!({
            "k1": "spam",
            "k2": { "username": "b", "content": "yo", "timestamp": "T" },
            "k3": 42
        }));
        let ids: Vec<String> = project_collection(data).into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["k2"]);
    }

    #[test]
    fn test_now_timestamp_has_millisecond_precision() {
        let ts = now_timestamp();
        // 2024-03-05T14:07:09.123Z
        assert_eq!(ts.len(), 24);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[19..20], ".");
        assert!(OffsetDateTime::parse(&ts, &Rfc3339).is_ok());
    }

    #[test]
    fn test_compose_trims_fields() {
        let body = MessageBody::compose("  neo ", "\n wake up \n").unwrap();
        assert_eq!(body.username, "neo");
        assert_eq!(body.content, "wake up");
        assert!(OffsetDateTime::parse(&body.timestamp, &Rfc3339).is_ok());
    }

    #[test]
    fn test_compose_rejects_blank() {
        assert!(MessageBody::compose("  ", "hello").is_none());
        assert!(MessageBody::compose("bob", "   ").is_none());
        assert!(MessageBody::compose("", "").is_none());
    }

    #[test]
    fn test_body_serializes_without_id() {
        let body = MessageBody {
            username: "bob".to_string(),
            content: "hi".to_string(),
            timestamp: "T".to_string(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({ "username": "bob", "content": "hi", "timestamp": "T" }));
    }

    #[test]
    fn test_display_timestamp() {
        let msg = Message {
            id: "k".to_string(),
            username: "a".to_string(),
            content: "x".to_string(),
            timestamp: "2024-03-05T14:07:09.123Z".to_string(),
        };
        assert_eq!(msg.display_timestamp(), "05/03/2024, 14:07:09");
    }

    #[test]
    fn test_display_timestamp_falls_back_to_raw() {
        let msg = Message {
            id: "k".to_string(),
            username: "a".to_string(),
            content: "x".to_string(),
            timestamp: "yesterday".to_string(),
        };
        assert_eq!(msg.display_timestamp(), "yesterday");
    }
}
