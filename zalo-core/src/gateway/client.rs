//! # Gateway HTTP client
//!
//! Request/response wrapper over the gateway's HTTP API. Every call is an
//! independent JSON request bounded by the configured timeout; nothing is
//! retried here.

use std::path::Path;

use reqwest::{Client, ClientBuilder, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use zalo_types::ThreadKind;

use super::types::{
    CookieLoginRequest, CookieLoginResponse, ErrorResponse, GatewayGroup, GatewayUser,
    GroupEnvelope, HealthResponse, LoginSessionResponse, QrLoginResponse, SelfResponse,
    SendImageRequest, SendReactionRequest, SendResponse, SendStickerRequest, SendTextRequest,
    UndoRequest, UserEnvelope,
};
use crate::config::GatewayConfig;
use crate::error::{BridgeError, BridgeResult};

#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http: Client,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> BridgeResult<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BridgeError::configuration("Gateway URL cannot be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(BridgeError::configuration(format!(
                "Gateway URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let http = ClientBuilder::new()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| BridgeError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, http })
    }

    /// Client for `base_url` with default timeouts.
    pub fn with_base_url(base_url: impl Into<String>) -> BridgeResult<Self> {
        Self::new(&GatewayConfig::new(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Event stream endpoint: scheme `http` becomes `ws`, path `/ws`.
    ///
    /// `new` only accepts `http://` and `https://` bases, so the replaced
    /// prefix is always the scheme.
    pub fn websocket_url(&self) -> String {
        format!("{}/ws", self.base_url.replacen("http", "ws", 1))
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> BridgeResult<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, path, "Gateway request");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BridgeError::transport(format!("{} {}: {}", method, path, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BridgeError::transport(format!("{} {}: read body: {}", method, path, e)))?;

        if status.as_u16() >= 400 {
            return Err(parse_error_response(status, &text));
        }
        Ok(text)
    }

    async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> BridgeResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.execute(method, path, body).await?;
        serde_json::from_str(&text)
            .map_err(|e| BridgeError::protocol(format!("{}: unexpected response: {}", path, e)))
    }

    /// For calls whose success body carries nothing the caller needs.
    async fn request_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> BridgeResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, body).await.map(|_| ())
    }

    /// Restores a session from stored credentials.
    pub async fn login_cookie(
        &self,
        cookie: &str,
        imei: &str,
        user_agent: &str,
    ) -> BridgeResult<CookieLoginResponse> {
        let body = CookieLoginRequest {
            cookie,
            imei,
            user_agent,
        };
        self.request(Method::POST, "/login/cookie", Some(&body)).await
    }

    pub async fn login_qr(&self) -> BridgeResult<QrLoginResponse> {
        self.request::<(), _>(Method::POST, "/login/qr", None).await
    }

    /// Polls for completion of a QR login started with [`Self::login_qr`].
    pub async fn wait_login(&self) -> BridgeResult<LoginSessionResponse> {
        self.request::<(), _>(Method::GET, "/login/wait", None).await
    }

    pub async fn logout(&self) -> BridgeResult<()> {
        self.request_empty::<()>(Method::POST, "/logout", None).await
    }

    pub async fn health(&self) -> BridgeResult<HealthResponse> {
        self.request::<(), _>(Method::GET, "/health", None).await
    }

    pub async fn send_text(
        &self,
        msg: &str,
        thread_id: &str,
        kind: ThreadKind,
        quote: Option<&str>,
    ) -> BridgeResult<SendResponse> {
        let body = SendTextRequest {
            msg,
            thread_id,
            thread_type: kind,
            quote,
        };
        self.request(Method::POST, "/send/text", Some(&body)).await
    }

    /// Sends the image at `file_path`, which the gateway reads from disk.
    pub async fn send_image(
        &self,
        file_path: &Path,
        thread_id: &str,
        kind: ThreadKind,
    ) -> BridgeResult<SendResponse> {
        let file_path = file_path.to_string_lossy();
        let body = SendImageRequest {
            file_path: &file_path,
            thread_id,
            thread_type: kind,
        };
        self.request(Method::POST, "/send/image", Some(&body)).await
    }

    pub async fn send_sticker(
        &self,
        sticker_id: &str,
        thread_id: &str,
        kind: ThreadKind,
    ) -> BridgeResult<SendResponse> {
        let body = SendStickerRequest {
            sticker_id,
            thread_id,
            thread_type: kind,
        };
        self.request(Method::POST, "/send/sticker", Some(&body)).await
    }

    /// An empty `emoji` removes the reaction.
    pub async fn send_reaction(
        &self,
        message_id: &str,
        emoji: &str,
        thread_id: &str,
        kind: ThreadKind,
    ) -> BridgeResult<()> {
        let body = SendReactionRequest {
            message_id,
            emoji,
            thread_id,
            thread_type: kind,
        };
        self.request_empty(Method::POST, "/send/reaction", Some(&body)).await
    }

    pub async fn undo_message(
        &self,
        message_id: &str,
        thread_id: &str,
        kind: ThreadKind,
    ) -> BridgeResult<()> {
        let body = UndoRequest {
            message_id,
            thread_id,
            thread_type: kind,
        };
        self.request_empty(Method::POST, "/send/undo", Some(&body)).await
    }

    pub async fn get_user_info(&self, user_id: &str) -> BridgeResult<GatewayUser> {
        let path = format!("/user/{}", user_id);
        let envelope: UserEnvelope = self.request::<(), _>(Method::GET, &path, None).await?;
        Ok(envelope.user)
    }

    pub async fn get_group_info(&self, group_id: &str) -> BridgeResult<GatewayGroup> {
        let path = format!("/group/{}", group_id);
        let envelope: GroupEnvelope = self.request::<(), _>(Method::GET, &path, None).await?;
        Ok(envelope.group)
    }

    pub async fn get_self_id(&self) -> BridgeResult<String> {
        let resp: SelfResponse = self.request::<(), _>(Method::GET, "/self", None).await?;
        Ok(resp.own_id)
    }
}

/// Maps a >= 400 response onto the error taxonomy.
fn parse_error_response(status: StatusCode, body: &str) -> BridgeError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) if !err.error.is_empty() => BridgeError::remote_api(err.code, err.error),
        _ => BridgeError::remote_api("", format!("{} {}", status.as_u16(), body)),
    }
}
