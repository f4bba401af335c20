//! # Connector
//!
//! Entry point the hosting framework loads: bridge metadata, login flows and
//! construction of per-login session clients.

mod login;
mod network;

pub use login::{LoginProcess, QrLogin, QR_FLOW_ID, STEP_COMPLETE, STEP_QR};
pub use network::{capabilities, NetworkApi, CAPABILITIES_ID};

use zalo_types::{LoginFlow, LoginMetadata};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::gateway::GatewayClient;
use crate::session::{HostContext, ZaloClient};

pub const DEFAULT_PORT: u16 = 29322;

/// Static description of the bridged network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeName {
    pub display_name: &'static str,
    pub network_url: &'static str,
    pub network_id: &'static str,
    pub default_port: u16,
}

pub struct ZaloConnector {
    config: BridgeConfig,
    host: HostContext,
}

impl ZaloConnector {
    pub fn new(config: BridgeConfig, host: HostContext) -> Self {
        Self { config, host }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn name(&self) -> BridgeName {
        BridgeName {
            display_name: "Zalo",
            network_url: "https://zalo.me",
            network_id: "zalo",
            default_port: DEFAULT_PORT,
        }
    }

    /// `(info_version, capabilities_version)`
    pub fn bridge_info_version(&self) -> (u32, u32) {
        (1, 1)
    }

    pub fn login_flows(&self) -> Vec<LoginFlow> {
        vec![LoginFlow {
            id: QR_FLOW_ID.to_string(),
            name: "QR Code".to_string(),
            description: "Scan a QR code with the Zalo mobile app".to_string(),
        }]
    }

    pub fn create_login(&self, flow_id: &str) -> BridgeResult<Box<dyn LoginProcess>> {
        match flow_id {
            QR_FLOW_ID => {
                let gateway = GatewayClient::new(&self.config.gateway)?;
                Ok(Box::new(QrLogin::new(gateway)))
            }
            other => Err(BridgeError::invalid_login_flow(other)),
        }
    }

    /// Builds the session client for stored credentials. Does not connect.
    pub fn load_user_login(&self, metadata: LoginMetadata) -> BridgeResult<ZaloClient> {
        ZaloClient::new(metadata, &self.config, self.host.clone())
    }
}
