use tracing::{debug, warn};

use zalo_types::{
    EventMeta, EventSender, MediaAttachment, MediaKind, PortalKey, ReactionAction, RemoteEvent,
    RemoteMessage, RemoteReaction, RemoteRemoval,
};

use super::wire::{event_time, GatewayEnvelope, MessagePayload, ReactionPayload, UndoPayload, WireEventKind};
use super::EventTranslator;
use crate::error::{BridgeError, BridgeResult};
use crate::media::{detect_mime, extension_for};

const STICKER_FILE_NAME: &str = "sticker.png";
const STICKER_MIME: &str = "image/png";

impl EventTranslator {
    /// Translates one stream frame.
    ///
    /// `Ok(None)` means the frame was consumed without producing an event:
    /// echoes of our own messages, malformed payloads, informational and
    /// unknown kinds. Only media re-hosting failures are returned as errors,
    /// and they concern this single message.
    pub async fn translate(&self, envelope: &GatewayEnvelope) -> BridgeResult<Option<RemoteEvent>> {
        match envelope.kind() {
            WireEventKind::Message => {
                let Some(payload) = decode::<MessagePayload>(envelope) else {
                    return Ok(None);
                };
                if payload.is_self {
                    debug!(msg_id = %payload.msg_id, "Skipping self-sent message");
                    return Ok(None);
                }
                self.convert_message(payload, envelope.timestamp)
                    .await
                    .map(|m| Some(RemoteEvent::Message(m)))
            }
            WireEventKind::Reaction => Ok(decode::<ReactionPayload>(envelope)
                .map(|p| RemoteEvent::Reaction(self.convert_reaction(p, envelope.timestamp)))),
            WireEventKind::Undo => Ok(decode::<UndoPayload>(envelope)
                .map(|p| RemoteEvent::Removal(self.convert_undo(p, envelope.timestamp)))),
            WireEventKind::GroupEvent => {
                debug!(data = %envelope.data, "Group event received");
                Ok(None)
            }
            WireEventKind::Connection => {
                debug!(data = %envelope.data, "Gateway greeting received");
                Ok(None)
            }
            WireEventKind::Unknown(kind) => {
                warn!(kind = %kind, "Unknown gateway event type");
                Ok(None)
            }
        }
    }

    fn is_own(&self, sender_id: &str) -> bool {
        !self.own_user_id.is_empty() && self.own_user_id == sender_id
    }

    async fn convert_message(&self, payload: MessagePayload, frame_ms: i64) -> BridgeResult<RemoteMessage> {
        let meta = EventMeta {
            portal: PortalKey::new(&payload.thread_id, payload.thread_type),
            sender: EventSender::new(payload.sender_id.clone(), payload.is_self),
            timestamp: event_time(payload.timestamp, frame_ms),
        };

        let kind = match payload.msg_type.as_str() {
            "image" | "gif" => Some(MediaKind::Image),
            "sticker" => Some(MediaKind::Sticker),
            _ => None,
        };

        let media = match kind {
            Some(kind) if !payload.media_url.is_empty() => {
                Some(self.rehost(kind, &payload).await?)
            }
            Some(_) => {
                debug!(msg_id = %payload.msg_id, "Media message without URL, sending as text");
                None
            }
            None => None,
        };

        let body = match (&media, kind) {
            _ if !payload.content.is_empty() => payload.content.clone(),
            (Some(_), Some(MediaKind::Sticker)) => "sticker".to_string(),
            (Some(_), _) => "image".to_string(),
            (None, Some(MediaKind::Sticker)) => "[sticker]".to_string(),
            (None, Some(MediaKind::Image)) => "[image]".to_string(),
            (None, None) => String::new(),
        };

        Ok(RemoteMessage {
            meta,
            message_id: payload.msg_id,
            body,
            media,
        })
    }

    /// Downloads the remote media and uploads it to the local content store.
    async fn rehost(&self, kind: MediaKind, payload: &MessagePayload) -> BridgeResult<MediaAttachment> {
        let data = self.fetcher.fetch(&payload.media_url).await?;
        let size = data.len();

        let (file_name, mime_type) = match kind {
            MediaKind::Sticker => (STICKER_FILE_NAME.to_string(), STICKER_MIME),
            MediaKind::Image => {
                let mime = detect_mime(&data);
                (format!("image.{}", extension_for(mime)), mime)
            }
        };

        let content_uri = self
            .media
            .upload(data, &file_name, mime_type)
            .await
            .map_err(|e| BridgeError::media_upload(e.to_string()))?;

        debug!(msg_id = %payload.msg_id, %content_uri, size, "Re-hosted remote media");

        Ok(MediaAttachment {
            kind,
            content_uri,
            source_url: payload.media_url.clone(),
            mime_type: mime_type.to_string(),
            width: payload.width,
            height: payload.height,
            size,
        })
    }

    fn convert_reaction(&self, payload: ReactionPayload, frame_ms: i64) -> RemoteReaction {
        let action = ReactionAction::from_wire(&payload.action);
        debug!(
            emoji = %payload.emoji,
            target = %payload.target_msg_id,
            action = %payload.action,
            "Reaction event"
        );
        RemoteReaction {
            meta: EventMeta {
                portal: PortalKey::new(&payload.thread_id, payload.thread_type),
                sender: EventSender::new(payload.sender_id.clone(), self.is_own(&payload.sender_id)),
                timestamp: event_time(payload.timestamp, frame_ms),
            },
            target_message_id: payload.target_msg_id,
            emoji: payload.emoji,
            action,
        }
    }

    fn convert_undo(&self, payload: UndoPayload, frame_ms: i64) -> RemoteRemoval {
        debug!(msg_id = %payload.msg_id, sender = %payload.sender_id, "Undo event");
        RemoteRemoval {
            meta: EventMeta {
                portal: PortalKey::new(&payload.thread_id, payload.thread_type),
                sender: EventSender::new(payload.sender_id.clone(), self.is_own(&payload.sender_id)),
                timestamp: event_time(payload.timestamp, frame_ms),
            },
            target_message_id: payload.msg_id,
        }
    }
}

/// Decodes the frame payload, logging and swallowing failures.
fn decode<T: for<'de> serde::Deserialize<'de>>(envelope: &GatewayEnvelope) -> Option<T> {
    match envelope.payload::<T>() {
        Ok(payload) => Some(payload),
        Err(e) => {
            warn!(kind = %envelope.kind, error = %e, "Dropping malformed gateway event");
            None
        }
    }
}
