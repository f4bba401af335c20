use serde::{Deserialize, Serialize};

use crate::portal::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[default]
    Default,
    Dm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    #[default]
    Join,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMember {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default)]
    pub membership: Membership,
}

impl ChatMember {
    pub fn joined(user_id: impl Into<UserId>, nickname: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            nickname,
            membership: Membership::Join,
        }
    }
}

/// Portal metadata derived from the remote conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatInfo {
    pub name: Option<String>,
    pub members: Vec<ChatMember>,
    /// Set for direct chats only.
    pub other_user_id: Option<UserId>,
    pub room_type: RoomType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// What a portal can carry across the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFeatures {
    pub id: String,
    pub text: bool,
    pub images: bool,
    pub reactions: bool,
    pub message_removal: bool,
    pub replies: bool,
    pub edits: bool,
    pub files: bool,
}
