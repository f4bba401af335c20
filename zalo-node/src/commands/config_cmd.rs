//! # Configuration Command

use anyhow::Result;

use zalo_core::BridgeConfig;

/// Prints the annotated example, or the effective configuration as JSON.
pub fn execute(config: &BridgeConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", BridgeConfig::example());
    }
    Ok(())
}
