//! # Run Command
//!
//! Connects one stored login and streams its events until interrupted or
//! until the session is lost for good.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::time::interval;
use tracing::info;

use zalo_core::{BridgeConfig, ZaloClient};

const LIVENESS_POLL: Duration = Duration::from_millis(500);

pub async fn execute(config: &BridgeConfig, login: &Path, media_dir: &Path) -> Result<()> {
    let metadata = super::read_login(login)?;
    let connector = super::connector(config, media_dir);
    let client = connector.load_user_login(metadata)?;

    client
        .connect()
        .await
        .context("Failed to connect to the Zalo gateway")?;
    info!(user_id = %client.metadata().user_id, "Streaming events, press Ctrl-C to stop");

    let outcome = wait_for_shutdown(&client, tokio::signal::ctrl_c()).await;

    info!("Shutting down");
    client.disconnect().await;
    outcome
}

/// Waits for `interrupt`, or fails once the session stops being logged in
/// (reconnect gave up).
async fn wait_for_shutdown<F>(client: &ZaloClient, interrupt: F) -> Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(interrupt);
    let mut ticker = interval(LIVENESS_POLL);
    loop {
        tokio::select! {
            biased;
            signal = &mut interrupt => {
                signal.context("Failed to listen for Ctrl-C")?;
                return Ok(());
            }
            _ = ticker.tick() => {
                if !client.is_logged_in() {
                    bail!("Lost the Zalo session: {}", client.session_state());
                }
            }
        }
    }
}
