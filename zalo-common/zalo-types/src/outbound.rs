use serde::{Deserialize, Serialize};

use crate::portal::{MessageId, PortalKey, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundMsgType {
    Text,
    Notice,
    Emote,
    Image,
    File,
    Video,
    Audio,
    Sticker,
    Location,
}

impl OutboundMsgType {
    pub fn is_text_like(self) -> bool {
        matches!(self, Self::Text | Self::Notice | Self::Emote)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Notice => "notice",
            Self::Emote => "emote",
            Self::Image => "image",
            Self::File => "file",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Sticker => "sticker",
            Self::Location => "location",
        }
    }
}

/// Message content produced on the local side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundContent {
    pub msg_type: OutboundMsgType,
    pub body: String,
    /// Content-store reference for media messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<MessageId>,
}

impl OutboundContent {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            msg_type: OutboundMsgType::Text,
            body: body.into(),
            url: None,
            reply_to: None,
        }
    }

    pub fn image(body: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            msg_type: OutboundMsgType::Image,
            body: body.into(),
            url: Some(url.into()),
            reply_to: None,
        }
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<MessageId>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub portal: PortalKey,
    pub content: OutboundContent,
}

/// Acknowledgment for a delivered outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message_id: MessageId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundReaction {
    pub portal: PortalKey,
    pub target_message_id: MessageId,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionPreResponse {
    pub sender_id: UserId,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundReactionRemove {
    pub portal: PortalKey,
    pub target_message_id: MessageId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRemoval {
    pub portal: PortalKey,
    pub target_message_id: MessageId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_like_types() {
        assert!(OutboundMsgType::Text.is_text_like());
        assert!(OutboundMsgType::Notice.is_text_like());
        assert!(OutboundMsgType::Emote.is_text_like());
        assert!(!OutboundMsgType::Image.is_text_like());
        assert!(!OutboundMsgType::File.is_text_like());
    }

    #[test]
    fn test_content_builders() {
        let content = OutboundContent::image("cat.png", "mxc://local/abc").with_reply_to("m1");
        assert_eq!(content.msg_type, OutboundMsgType::Image);
        assert_eq!(content.url.as_deref(), Some("mxc://local/abc"));
        assert_eq!(content.reply_to.as_deref(), Some("m1"));

        let json = serde_json::to_value(OutboundContent::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"msg_type": "text", "body": "hi"}));
    }
}
