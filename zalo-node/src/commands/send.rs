use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use zalo_core::{BridgeConfig, NetworkApi};
use zalo_types::{LoginMetadata, OutboundContent, OutboundMessage, PortalKey};

pub async fn execute(
    config: &BridgeConfig,
    portal: &str,
    text: &str,
    login: Option<&Path>,
    json: bool,
) -> Result<()> {
    let metadata = match login {
        Some(path) => super::read_login(path)?,
        None => LoginMetadata::default(),
    };
    let connector = super::connector(config, &config.media.temp_dir());
    let client = connector.load_user_login(metadata)?;

    let msg = OutboundMessage {
        portal: PortalKey::from_raw(portal),
        content: OutboundContent::text(text),
    };
    let resp = client
        .handle_outbound_message(&msg)
        .await
        .with_context(|| format!("Failed to send to {}", portal))?;

    if json {
        println!("{}", json!({"portal": portal, "message_id": resp.message_id}));
    } else {
        println!("Sent {}", resp.message_id);
    }
    Ok(())
}
