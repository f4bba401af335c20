//! Frames and payloads of the gateway event stream.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use zalo_types::ThreadKind;

use crate::error::{BridgeError, BridgeResult};
use crate::gateway::lenient::{self, pick_string};

/// `{type, data, timestamp}` frame envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GatewayEnvelope {
    #[serde(rename = "type", default, deserialize_with = "lenient::de_string")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, deserialize_with = "lenient::de_i64")]
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireEventKind {
    Message,
    Reaction,
    Undo,
    GroupEvent,
    /// Greeting sent by the gateway right after the socket opens
    Connection,
    Unknown(String),
}

impl GatewayEnvelope {
    pub fn parse(text: &str) -> BridgeResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| BridgeError::protocol(format!("malformed gateway frame: {}", e)))
    }

    pub fn kind(&self) -> WireEventKind {
        match self.kind.as_str() {
            "message" => WireEventKind::Message,
            "reaction" => WireEventKind::Reaction,
            "undo" => WireEventKind::Undo,
            "group_event" => WireEventKind::GroupEvent,
            "connection" => WireEventKind::Connection,
            other => WireEventKind::Unknown(other.to_string()),
        }
    }

    /// Decodes `data` as the payload for this frame's kind.
    pub fn payload<T: for<'de> Deserialize<'de>>(&self) -> BridgeResult<T> {
        T::deserialize(&self.data).map_err(|e| {
            BridgeError::protocol(format!("malformed {} payload: {}", self.kind, e))
        })
    }
}

fn de_thread_kind<'de, D>(deserializer: D) -> Result<ThreadKind, D::Error>
where
    D: Deserializer<'de>,
{
    lenient::de_i64(deserializer).map(ThreadKind::from)
}

/// Message text. Rich messages carry an object instead of a string; its
/// `title`, `description` and `href` lines make up the text.
fn de_content<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(obj @ Value::Object(_)) => ["title", "description", "href"]
            .iter()
            .map(|key| pick_string(&obj, &[*key]))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Some(other) => lenient::value_to_string(&other),
        None => String::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub msg_id: String,
    #[serde(default, deserialize_with = "de_content")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub thread_id: String,
    #[serde(default, deserialize_with = "de_thread_kind")]
    pub thread_type: ThreadKind,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub sender_id: String,
    #[serde(default, deserialize_with = "lenient::de_bool")]
    pub is_self: bool,
    #[serde(default, deserialize_with = "lenient::de_i64")]
    pub timestamp: i64,
    #[serde(default)]
    pub quote: Option<Value>,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub msg_type: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub media_url: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub thumb: String,
    #[serde(default, deserialize_with = "lenient::de_u32")]
    pub width: u32,
    #[serde(default, deserialize_with = "lenient::de_u32")]
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionPayload {
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub emoji: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub target_msg_id: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub sender_id: String,
    /// `"add"` or `"remove"`
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub action: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub thread_id: String,
    #[serde(default, deserialize_with = "de_thread_kind")]
    pub thread_type: ThreadKind,
    #[serde(default, deserialize_with = "lenient::de_i64")]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoPayload {
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub msg_id: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub sender_id: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub thread_id: String,
    #[serde(default, deserialize_with = "de_thread_kind")]
    pub thread_type: ThreadKind,
    #[serde(default, deserialize_with = "lenient::de_i64")]
    pub timestamp: i64,
}

/// Event time from the payload, else the frame, else now.
pub fn event_time(payload_ms: i64, frame_ms: i64) -> DateTime<Utc> {
    [payload_ms, frame_ms]
        .into_iter()
        .filter(|ms| *ms > 0)
        .find_map(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_parse() {
        let env = GatewayEnvelope::parse(
            r#"{"type":"message","data":{"msgId":"1"},"timestamp":1700000000000}"#,
        )
        .unwrap();
        assert_eq!(env.kind(), WireEventKind::Message);
        assert_eq!(env.timestamp, 1_700_000_000_000);

        let env = GatewayEnvelope::parse(r#"{"type":"connection","data":{"status":"connected"}}"#)
            .unwrap();
        assert_eq!(env.kind(), WireEventKind::Connection);

        let env = GatewayEnvelope::parse(r#"{"type":"typing"}"#).unwrap();
        assert_eq!(env.kind(), WireEventKind::Unknown("typing".into()));
        assert!(env.data.is_null());
    }

    #[test]
    fn test_envelope_malformed() {
        assert!(matches!(
            GatewayEnvelope::parse("{not json"),
            Err(BridgeError::Protocol(_))
        ));
    }

    #[test]
    fn test_message_payload_lenient() {
        let env = GatewayEnvelope {
            kind: "message".into(),
            data: json!({
                "msgId": 998877,
                "content": {"title": "Link", "href": "https://zalo.me"},
                "threadId": "42",
                "threadType": "1",
                "senderId": 7,
                "width": "320",
                "height": 240
            }),
            timestamp: 0,
        };
        let payload: MessagePayload = env.payload().unwrap();
        assert_eq!(payload.msg_id, "998877");
        assert_eq!(payload.content, "Link\nhttps://zalo.me");
        assert_eq!(payload.thread_type, ThreadKind::Group);
        assert_eq!(payload.sender_id, "7");
        assert_eq!((payload.width, payload.height), (320, 240));
        assert!(!payload.is_self);
    }

    #[test]
    fn test_payload_not_an_object() {
        let env = GatewayEnvelope {
            kind: "reaction".into(),
            data: json!("{broken"),
            timestamp: 0,
        };
        assert!(env.payload::<ReactionPayload>().is_err());
    }

    #[test]
    fn test_event_time_fallbacks() {
        assert_eq!(event_time(1_000, 2_000).timestamp_millis(), 1_000);
        assert_eq!(event_time(0, 2_000).timestamp_millis(), 2_000);
        let before = Utc::now();
        assert!(event_time(0, 0) >= before);
    }
}
