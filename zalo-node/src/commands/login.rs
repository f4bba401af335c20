//! # Login Command
//!
//! Runs the QR login flow and hands back the credentials to keep.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use zalo_core::connector::QR_FLOW_ID;
use zalo_core::BridgeConfig;
use zalo_types::{LoginMetadata, LoginStep};

pub async fn execute(config: &BridgeConfig, save: Option<PathBuf>, json: bool) -> Result<()> {
    let connector = super::connector(config, &config.media.temp_dir());
    let login = connector.create_login(QR_FLOW_ID)?;

    let step = login.start().await.context("Failed to start QR login")?;
    match &step {
        LoginStep::DisplayAndWait {
            instructions,
            qr_data,
            ..
        } => {
            if json {
                println!("{}", serde_json::to_string(&step)?);
            } else {
                println!("{}", instructions);
                println!("{}", qr_data);
            }
        }
        LoginStep::Complete { .. } => bail!("Gateway skipped the QR step"),
    }

    let metadata = match login.wait().await {
        Ok(LoginStep::Complete { metadata, .. }) => metadata,
        Ok(other) => {
            login.cancel().await;
            bail!("Unexpected login step {}", other.step_id());
        }
        Err(e) => {
            login.cancel().await;
            return Err(e).context("QR login did not complete");
        }
    };
    info!(user_id = %metadata.user_id, "Logged in");

    match save {
        Some(path) => {
            save_login(&path, &metadata)?;
            println!("Saved login for {} to {}", metadata.user_id, path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&metadata)?),
    }
    Ok(())
}

fn save_login(path: &Path, metadata: &LoginMetadata) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(metadata)?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
