use tracing::{debug, info};

use zalo_types::{
    MessageResponse, OutboundMessage, OutboundMsgType, OutboundReaction, OutboundReactionRemove,
    OutboundRemoval, PortalKey,
};

use super::EventTranslator;
use crate::error::{BridgeError, BridgeResult};
use crate::media::TempMedia;

impl EventTranslator {
    /// Delivers a local message to the remote thread behind its portal.
    pub async fn handle_outbound_message(&self, msg: &OutboundMessage) -> BridgeResult<MessageResponse> {
        let (thread_id, kind) = msg.portal.parse();

        match msg.content.msg_type {
            t if t.is_text_like() => {
                // Replies are sent unquoted: there is no message store to map
                // `reply_to` onto a remote message id.
                if let Some(reply_to) = &msg.content.reply_to {
                    debug!(reply_to = %reply_to, "Sending reply without quote");
                }
                let resp = self
                    .gateway
                    .send_text(&msg.content.body, &thread_id, kind, None)
                    .await?;
                info!(thread_id = %thread_id, msg_id = %resp.message_id, "Sent text message");
                Ok(MessageResponse {
                    message_id: resp.message_id,
                })
            }
            OutboundMsgType::Image => self.send_image(msg, &thread_id, kind).await,
            other => Err(BridgeError::unsupported_message_type(other.as_str())),
        }
    }

    async fn send_image(
        &self,
        msg: &OutboundMessage,
        thread_id: &str,
        kind: zalo_types::ThreadKind,
    ) -> BridgeResult<MessageResponse> {
        let uri = msg
            .content
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| BridgeError::media_fetch("image message has no content URI"))?;

        let data = self
            .media
            .download(uri)
            .await
            .map_err(|e| BridgeError::media_fetch(format!("download {}: {}", uri, e)))?;

        // Removed when `staged` drops, whichever way this function returns.
        let staged = TempMedia::write(&self.temp_dir, &data)?;
        debug!(path = %staged.path().display(), size = data.len(), "Staged outbound image");

        let resp = self.gateway.send_image(staged.path(), thread_id, kind).await?;
        info!(thread_id = %thread_id, msg_id = %resp.message_id, "Sent image message");
        Ok(MessageResponse {
            message_id: resp.message_id,
        })
    }

    pub async fn handle_outbound_reaction(&self, reaction: &OutboundReaction) -> BridgeResult<()> {
        self.react(&reaction.portal, &reaction.target_message_id, &reaction.emoji)
            .await
    }

    pub async fn handle_outbound_reaction_remove(&self, removal: &OutboundReactionRemove) -> BridgeResult<()> {
        self.react(&removal.portal, &removal.target_message_id, "").await
    }

    async fn react(&self, portal: &PortalKey, target: &str, emoji: &str) -> BridgeResult<()> {
        let (thread_id, kind) = portal.parse();
        self.gateway
            .send_reaction(target, emoji, &thread_id, kind)
            .await
    }

    pub async fn handle_outbound_message_removal(&self, removal: &OutboundRemoval) -> BridgeResult<()> {
        let (thread_id, kind) = removal.portal.parse();
        self.gateway
            .undo_message(&removal.target_message_id, &thread_id, kind)
            .await
    }
}
