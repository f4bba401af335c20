//! # Login processes
//!
//! QR login: the gateway produces a QR payload, the user scans it with the
//! mobile app, and `wait` returns the credentials to persist.

use async_trait::async_trait;
use tracing::{debug, info};

use zalo_types::{LoginMetadata, LoginStep};

use crate::error::{BridgeError, BridgeResult};
use crate::gateway::GatewayClient;

pub const QR_FLOW_ID: &str = "qr";
pub const STEP_QR: &str = "fi.mau.zalo.login.qr";
pub const STEP_COMPLETE: &str = "fi.mau.zalo.login.complete";

#[async_trait]
pub trait LoginProcess: Send + Sync {
    async fn start(&self) -> BridgeResult<LoginStep>;

    /// Blocks until the user finishes on their device.
    async fn wait(&self) -> BridgeResult<LoginStep>;

    async fn cancel(&self);
}

pub struct QrLogin {
    gateway: GatewayClient,
}

impl QrLogin {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl LoginProcess for QrLogin {
    async fn start(&self) -> BridgeResult<LoginStep> {
        let resp = self.gateway.login_qr().await?;
        if resp.qr.is_empty() {
            return Err(BridgeError::protocol("gateway returned no QR payload"));
        }
        debug!(success = resp.success, "QR login started");

        Ok(LoginStep::DisplayAndWait {
            step_id: STEP_QR.to_string(),
            instructions: "Scan the QR code with your Zalo mobile app".to_string(),
            qr_data: resp.qr,
        })
    }

    async fn wait(&self) -> BridgeResult<LoginStep> {
        let metadata = LoginMetadata::from(self.gateway.wait_login().await?);
        if metadata.user_id.is_empty() {
            return Err(BridgeError::protocol("login completed without a user id"));
        }
        info!(user_id = %metadata.user_id, "QR login completed");

        Ok(LoginStep::Complete {
            step_id: STEP_COMPLETE.to_string(),
            instructions: "Successfully logged in to Zalo".to_string(),
            login_id: metadata.user_id.clone(),
            metadata,
        })
    }

    async fn cancel(&self) {
        if let Err(e) = self.gateway.logout().await {
            debug!(error = %e, "Logout after cancelled login failed");
        }
    }
}
