//! Translated remote events handed to the hosting framework's queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::portal::{MessageId, PortalKey, UserId};

/// Who caused a remote event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSender {
    pub sender: UserId,
    pub is_from_me: bool,
}

impl EventSender {
    pub fn new(sender: impl Into<UserId>, is_from_me: bool) -> Self {
        Self {
            sender: sender.into(),
            is_from_me,
        }
    }
}

/// Fields every translated event carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    pub portal: PortalKey,
    pub sender: EventSender,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteEventKind {
    Message,
    Reaction,
    ReactionRemove,
    MessageRemove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Sticker,
}

/// Media re-hosted into the local content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub kind: MediaKind,
    /// Opaque content reference returned by the media store.
    pub content_uri: String,
    /// Where the bytes were fetched from on the remote side.
    pub source_url: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMessage {
    pub meta: EventMeta,
    pub message_id: MessageId,
    pub body: String,
    pub media: Option<MediaAttachment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionAction {
    Add,
    Remove,
}

impl ReactionAction {
    /// `"remove"` removes, anything else (including absent) adds.
    pub fn from_wire(action: &str) -> Self {
        if action == "remove" {
            Self::Remove
        } else {
            Self::Add
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteReaction {
    pub meta: EventMeta,
    pub target_message_id: MessageId,
    pub emoji: String,
    pub action: ReactionAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRemoval {
    pub meta: EventMeta,
    pub target_message_id: MessageId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteEvent {
    Message(RemoteMessage),
    Reaction(RemoteReaction),
    Removal(RemoteRemoval),
}

impl RemoteEvent {
    pub fn kind(&self) -> RemoteEventKind {
        match self {
            Self::Message(_) => RemoteEventKind::Message,
            Self::Reaction(r) => match r.action {
                ReactionAction::Add => RemoteEventKind::Reaction,
                ReactionAction::Remove => RemoteEventKind::ReactionRemove,
            },
            Self::Removal(_) => RemoteEventKind::MessageRemove,
        }
    }

    pub fn meta(&self) -> &EventMeta {
        match self {
            Self::Message(m) => &m.meta,
            Self::Reaction(r) => &r.meta,
            Self::Removal(r) => &r.meta,
        }
    }

    pub fn portal(&self) -> &PortalKey {
        &self.meta().portal
    }

    pub fn sender(&self) -> &EventSender {
        &self.meta().sender
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.meta().timestamp
    }

    /// Only new messages may cause the framework to create a portal.
    pub fn should_create_portal(&self) -> bool {
        matches!(self, Self::Message(_))
    }

    /// Key/value pairs for the framework's log context.
    pub fn log_context(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Message(m) => vec![
                ("zalo_msg_id", m.message_id.clone()),
                ("thread_id", m.meta.portal.thread_id()),
            ],
            Self::Reaction(r) => vec![
                ("reaction_emoji", r.emoji.clone()),
                ("target_msg", r.target_message_id.clone()),
            ],
            Self::Removal(r) => vec![("undo_msg_id", r.target_message_id.clone())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::ThreadKind;

    fn meta() -> EventMeta {
        EventMeta {
            portal: PortalKey::new("42", ThreadKind::Group),
            sender: EventSender::new("7", false),
            timestamp: DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap(),
        }
    }

    #[test]
    fn test_reaction_action_from_wire() {
        assert_eq!(ReactionAction::from_wire("remove"), ReactionAction::Remove);
        assert_eq!(ReactionAction::from_wire("add"), ReactionAction::Add);
        assert_eq!(ReactionAction::from_wire(""), ReactionAction::Add);
        assert_eq!(ReactionAction::from_wire("REMOVE"), ReactionAction::Add);
    }

    #[test]
    fn test_event_kind_discriminator() {
        let reaction = RemoteEvent::Reaction(RemoteReaction {
            meta: meta(),
            target_message_id: "m1".into(),
            emoji: "/-heart".into(),
            action: ReactionAction::Remove,
        });
        assert_eq!(reaction.kind(), RemoteEventKind::ReactionRemove);
        assert!(!reaction.should_create_portal());

        let removal = RemoteEvent::Removal(RemoteRemoval {
            meta: meta(),
            target_message_id: "m1".into(),
        });
        assert_eq!(removal.kind(), RemoteEventKind::MessageRemove);
        assert_eq!(removal.portal().as_str(), "42:1");
    }

    #[test]
    fn test_message_log_context() {
        let msg = RemoteEvent::Message(RemoteMessage {
            meta: meta(),
            message_id: "m9".into(),
            body: "hi".into(),
            media: None,
        });
        assert!(msg.should_create_portal());
        assert_eq!(
            msg.log_context(),
            vec![("zalo_msg_id", "m9".to_string()), ("thread_id", "42".to_string())]
        );
    }
}
