//! In-process host for running a session without a homeserver.
//!
//! Events go to stdout as JSON lines, state changes to the log, and media to
//! a local directory addressed as `mxc://local/<uuid>`.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use zalo_traits::{BoxError, BridgeStateSink, MediaStore, RemoteEventSink};
use zalo_types::{BridgeState, RemoteEvent, StateEvent};

const LOCAL_MXC_PREFIX: &str = "mxc://local/";

/// Prints each event as one JSON line.
#[derive(Debug, Default)]
pub struct StdoutEventSink;

#[async_trait]
impl RemoteEventSink for StdoutEventSink {
    async fn queue_remote_event(&self, event: RemoteEvent) -> Result<(), BoxError> {
        let line = serde_json::to_string(&event)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogStateSink;

impl BridgeStateSink for LogStateSink {
    fn send_state(&self, state: BridgeState) {
        let error = state.error.as_deref().unwrap_or("");
        let message = state.message.as_deref().unwrap_or("");
        match state.state_event {
            StateEvent::Connecting | StateEvent::Connected | StateEvent::LoggedOut => {
                info!(state = %state.state_event, "Bridge state changed")
            }
            _ => warn!(state = %state.state_event, error, message, "Bridge state changed"),
        }
    }
}

/// Content repository backed by a plain directory.
#[derive(Debug, Clone)]
pub struct DirMediaStore {
    dir: PathBuf,
}

impl DirMediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, uri: &str) -> Result<PathBuf, BoxError> {
        let id = uri
            .strip_prefix(LOCAL_MXC_PREFIX)
            .ok_or_else(|| format!("not a local media URI: {}", uri))?;
        let id = Uuid::parse_str(id).map_err(|e| format!("bad media id in {}: {}", uri, e))?;
        Ok(self.dir.join(id.to_string()))
    }
}

#[async_trait]
impl MediaStore for DirMediaStore {
    async fn upload(&self, data: Vec<u8>, file_name: &str, mime_type: &str) -> Result<String, BoxError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let id = Uuid::new_v4();
        tokio::fs::write(self.dir.join(id.to_string()), &data).await?;
        info!(%id, file_name, mime_type, size = data.len(), "Stored media");
        Ok(format!("{}{}", LOCAL_MXC_PREFIX, id))
    }

    async fn download(&self, uri: &str) -> Result<Vec<u8>, BoxError> {
        let path = self.path_for(uri)?;
        Ok(tokio::fs::read(&path).await?)
    }
}
