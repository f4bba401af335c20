use serde::{Deserialize, Serialize};

use crate::portal::UserId;

/// Credentials persisted by the host for one remote account.
///
/// Opaque beyond these four fields; the core only forwards them to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoginMetadata {
    #[serde(default)]
    pub cookie: String,
    #[serde(default)]
    pub imei: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub user_id: UserId,
}

impl LoginMetadata {
    pub fn has_cookie(&self) -> bool {
        !self.cookie.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFlow {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoginStep {
    /// Show `qr_data` to the user and call `wait` next.
    DisplayAndWait {
        step_id: String,
        instructions: String,
        qr_data: String,
    },
    Complete {
        step_id: String,
        instructions: String,
        login_id: UserId,
        metadata: LoginMetadata,
    },
}

impl LoginStep {
    pub fn step_id(&self) -> &str {
        match self {
            Self::DisplayAndWait { step_id, .. } | Self::Complete { step_id, .. } => step_id,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}
