//! # CLI Commands
//!
//! Command implementations for the `zalo-bridge` CLI.

pub mod config_cmd;
pub mod health;
pub mod login;
pub mod run;
pub mod send;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use zalo_core::{BridgeConfig, HostContext, ZaloConnector};
use zalo_types::LoginMetadata;

use crate::host::{DirMediaStore, LogStateSink, StdoutEventSink};

/// Connector wired to the in-process host.
pub fn connector(config: &BridgeConfig, media_dir: &Path) -> ZaloConnector {
    let host = HostContext::new(
        Arc::new(StdoutEventSink),
        Arc::new(LogStateSink),
        Arc::new(DirMediaStore::new(media_dir)),
    );
    ZaloConnector::new(config.clone(), host)
}

pub fn read_login(path: &Path) -> Result<LoginMetadata> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read login file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid login file {}", path.display()))
}
