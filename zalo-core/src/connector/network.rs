//! # NetworkApi
//!
//! Callbacks the hosting framework invokes on a logged-in session.

use async_trait::async_trait;

use zalo_types::{
    ChatInfo, ChatMember, MessageResponse, OutboundMessage, OutboundReaction,
    OutboundReactionRemove, OutboundRemoval, PortalKey, ReactionPreResponse, RoomFeatures,
    RoomType, UserInfo,
};

use crate::error::BridgeResult;
use crate::gateway::{GatewayGroup, GatewayUser};
use crate::session::ZaloClient;

pub const CAPABILITIES_ID: &str = "fi.mau.zalo.capabilities.2025_01";

#[async_trait]
pub trait NetworkApi: Send + Sync {
    async fn connect(&self) -> BridgeResult<()>;

    async fn disconnect(&self);

    fn is_logged_in(&self) -> bool;

    async fn logout_remote(&self);

    fn is_this_user(&self, user_id: &str) -> bool;

    async fn get_chat_info(&self, portal: &PortalKey) -> BridgeResult<ChatInfo>;

    async fn get_user_info(&self, user_id: &str) -> BridgeResult<UserInfo>;

    fn get_capabilities(&self, portal: &PortalKey) -> RoomFeatures;

    async fn handle_outbound_message(&self, msg: &OutboundMessage) -> BridgeResult<MessageResponse>;

    fn pre_handle_outbound_reaction(&self, reaction: &OutboundReaction) -> ReactionPreResponse;

    async fn handle_outbound_reaction(&self, reaction: &OutboundReaction) -> BridgeResult<()>;

    async fn handle_outbound_reaction_remove(&self, removal: &OutboundReactionRemove) -> BridgeResult<()>;

    async fn handle_outbound_message_removal(&self, removal: &OutboundRemoval) -> BridgeResult<()>;
}

#[async_trait]
impl NetworkApi for ZaloClient {
    async fn connect(&self) -> BridgeResult<()> {
        ZaloClient::connect(self).await
    }

    async fn disconnect(&self) {
        ZaloClient::disconnect(self).await
    }

    fn is_logged_in(&self) -> bool {
        ZaloClient::is_logged_in(self)
    }

    async fn logout_remote(&self) {
        ZaloClient::logout_remote(self).await
    }

    fn is_this_user(&self, user_id: &str) -> bool {
        ZaloClient::is_this_user(self, user_id)
    }

    async fn get_chat_info(&self, portal: &PortalKey) -> BridgeResult<ChatInfo> {
        let (thread_id, kind) = portal.parse();
        if kind.is_group() {
            let group = self.gateway().get_group_info(&thread_id).await?;
            Ok(group_chat_info(group))
        } else {
            let user = self.gateway().get_user_info(&thread_id).await?;
            Ok(direct_chat_info(user))
        }
    }

    async fn get_user_info(&self, user_id: &str) -> BridgeResult<UserInfo> {
        let user = self.gateway().get_user_info(user_id).await?;
        Ok(user_info(user))
    }

    fn get_capabilities(&self, _portal: &PortalKey) -> RoomFeatures {
        capabilities()
    }

    async fn handle_outbound_message(&self, msg: &OutboundMessage) -> BridgeResult<MessageResponse> {
        self.translator().handle_outbound_message(msg).await
    }

    fn pre_handle_outbound_reaction(&self, reaction: &OutboundReaction) -> ReactionPreResponse {
        ReactionPreResponse {
            sender_id: self.metadata().user_id.clone(),
            emoji: reaction.emoji.clone(),
        }
    }

    async fn handle_outbound_reaction(&self, reaction: &OutboundReaction) -> BridgeResult<()> {
        self.translator().handle_outbound_reaction(reaction).await
    }

    async fn handle_outbound_reaction_remove(&self, removal: &OutboundReactionRemove) -> BridgeResult<()> {
        self.translator().handle_outbound_reaction_remove(removal).await
    }

    async fn handle_outbound_message_removal(&self, removal: &OutboundRemoval) -> BridgeResult<()> {
        self.translator().handle_outbound_message_removal(removal).await
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

pub(crate) fn group_chat_info(group: GatewayGroup) -> ChatInfo {
    let members = group
        .members
        .into_iter()
        .map(|m| ChatMember::joined(m.user_id, non_empty(m.display_name)))
        .collect();
    ChatInfo {
        name: non_empty(group.name),
        members,
        other_user_id: None,
        room_type: RoomType::Default,
    }
}

pub(crate) fn direct_chat_info(user: GatewayUser) -> ChatInfo {
    let name = non_empty(user.display_name);
    ChatInfo {
        members: vec![ChatMember::joined(user.id.clone(), name.clone())],
        name,
        other_user_id: non_empty(user.id),
        room_type: RoomType::Dm,
    }
}

pub(crate) fn user_info(user: GatewayUser) -> UserInfo {
    UserInfo {
        name: non_empty(user.display_name),
        avatar_url: non_empty(user.avatar_url),
    }
}

/// Same for every portal: replies, edits and files are not carried.
pub fn capabilities() -> RoomFeatures {
    RoomFeatures {
        id: CAPABILITIES_ID.to_string(),
        text: true,
        images: true,
        reactions: true,
        message_removal: true,
        replies: false,
        edits: false,
        files: false,
    }
}
