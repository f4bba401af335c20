use async_trait::async_trait;
use std::error::Error;

use zalo_types::{BridgeState, RemoteEvent};

pub type BoxError = Box<dyn Error + Send + Sync>;

/// The host's queue for translated remote events.
///
/// Awaiting `queue_remote_event` stalls the session's read loop until the
/// host has accepted the event.
#[async_trait]
pub trait RemoteEventSink: Send + Sync {
    async fn queue_remote_event(&self, event: RemoteEvent) -> Result<(), BoxError>;
}

/// The host's connection-state channel. Fire-and-forget.
pub trait BridgeStateSink: Send + Sync {
    fn send_state(&self, state: BridgeState);
}

/// Local content repository.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores `data` and returns an opaque content URI.
    async fn upload(&self, data: Vec<u8>, file_name: &str, mime_type: &str) -> Result<String, BoxError>;

    async fn download(&self, uri: &str) -> Result<Vec<u8>, BoxError>;
}
