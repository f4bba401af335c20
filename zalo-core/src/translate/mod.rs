//! # Event Translator
//!
//! Converts gateway stream frames into [`RemoteEvent`]s (inbound) and host
//! actions into gateway calls (outbound).
//!
//! [`RemoteEvent`]: zalo_types::RemoteEvent

use std::path::PathBuf;
use std::sync::Arc;

use zalo_traits::MediaStore;
use zalo_types::UserId;

use crate::config::BridgeConfig;
use crate::error::BridgeResult;
use crate::gateway::GatewayClient;
use crate::media::MediaFetcher;

mod inbound;
mod outbound;
pub mod wire;

pub use wire::{GatewayEnvelope, MessagePayload, ReactionPayload, UndoPayload, WireEventKind};

pub struct EventTranslator {
    gateway: GatewayClient,
    media: Arc<dyn MediaStore>,
    fetcher: MediaFetcher,
    own_user_id: UserId,
    temp_dir: PathBuf,
}

impl EventTranslator {
    pub fn new(
        gateway: GatewayClient,
        media: Arc<dyn MediaStore>,
        own_user_id: impl Into<UserId>,
        config: &BridgeConfig,
    ) -> BridgeResult<Self> {
        Ok(Self {
            gateway,
            media,
            fetcher: MediaFetcher::new(config.gateway.request_timeout())?,
            own_user_id: own_user_id.into(),
            temp_dir: config.media.temp_dir(),
        })
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    pub fn own_user_id(&self) -> &str {
        &self.own_user_id
    }
}
