//! Request and response bodies of the gateway HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use zalo_types::{LoginMetadata, ThreadKind};

use super::lenient::{self, pick_string};

/// Error body returned with any status >= 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub error: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieLoginRequest<'a> {
    pub cookie: &'a str,
    pub imei: &'a str,
    pub user_agent: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieLoginResponse {
    #[serde(default, deserialize_with = "lenient::de_bool")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub own_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QrLoginResponse {
    #[serde(default, deserialize_with = "lenient::de_bool")]
    pub success: bool,
    /// QR payload to render for the user
    #[serde(default, alias = "qrData", deserialize_with = "lenient::de_string")]
    pub qr: String,
    #[serde(default)]
    pub session: Option<Value>,
}

/// Credentials of a freshly completed login.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSessionResponse {
    #[serde(default, alias = "ownId", deserialize_with = "lenient::de_string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub cookie: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub imei: String,
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub user_agent: String,
}

impl From<LoginSessionResponse> for LoginMetadata {
    fn from(session: LoginSessionResponse) -> Self {
        Self {
            cookie: session.cookie,
            imei: session.imei,
            user_agent: session.user_agent,
            user_id: session.user_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTextRequest<'a> {
    pub msg: &'a str,
    pub thread_id: &'a str,
    pub thread_type: ThreadKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendImageRequest<'a> {
    pub file_path: &'a str,
    pub thread_id: &'a str,
    pub thread_type: ThreadKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendStickerRequest<'a> {
    pub sticker_id: &'a str,
    pub thread_id: &'a str,
    pub thread_type: ThreadKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReactionRequest<'a> {
    pub message_id: &'a str,
    /// Empty removes the reaction
    pub emoji: &'a str,
    pub thread_id: &'a str,
    pub thread_type: ThreadKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoRequest<'a> {
    pub message_id: &'a str,
    pub thread_id: &'a str,
    pub thread_type: ThreadKind,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub message_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfResponse {
    #[serde(default, deserialize_with = "lenient::de_string")]
    pub own_id: String,
}

/// Remote user profile. Field names vary between gateway versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct GatewayUser {
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
}

impl From<Value> for GatewayUser {
    fn from(value: Value) -> Self {
        Self {
            id: pick_string(&value, &["id", "userId", "uid"]),
            display_name: pick_string(&value, &["displayName", "zaloName", "name"]),
            avatar_url: pick_string(&value, &["avatarUrl", "avatar"]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayGroupMember {
    pub user_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct GatewayGroup {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    pub members: Vec<GatewayGroupMember>,
}

impl From<Value> for GatewayGroup {
    fn from(value: Value) -> Self {
        let members = value
            .get("members")
            .and_then(Value::as_array)
            .map(|members| {
                members
                    .iter()
                    .map(|m| GatewayGroupMember {
                        user_id: pick_string(m, &["userId", "id", "uid"]),
                        display_name: pick_string(m, &["displayName", "zaloName", "name"]),
                    })
                    .filter(|m| !m.user_id.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: pick_string(&value, &["id", "groupId"]),
            name: pick_string(&value, &["name"]),
            avatar_url: pick_string(&value, &["avatarUrl", "avatar"]),
            members,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: GatewayUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupEnvelope {
    pub group: GatewayGroup,
}
