use anyhow::{Context, Result};
use serde_json::json;

use zalo_core::{BridgeConfig, GatewayClient};

pub async fn execute(config: &BridgeConfig, json: bool) -> Result<()> {
    let gateway = GatewayClient::new(&config.gateway)?;
    let health = gateway
        .health()
        .await
        .with_context(|| format!("Gateway at {} is not healthy", gateway.base_url()))?;

    if json {
        println!(
            "{}",
            json!({"gateway": gateway.base_url(), "status": health.status})
        );
    } else {
        println!("Gateway {}: {}", gateway.base_url(), health.status);
    }
    Ok(())
}
