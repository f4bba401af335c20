//! # Bridge error types

use thiserror::Error;

/// Result type for every fallible core operation.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    /// Network, DNS or timeout failure talking to the gateway
    #[error("Transport error: {0}")]
    Transport(String),

    /// Gateway rejected the request
    #[error("Gateway error ({code}): {message}")]
    RemoteApi { code: String, message: String },

    /// Gateway answered with JSON that does not match the expected shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Media fetch failed: {0}")]
    MediaFetch(String),

    #[error("Media upload failed: {0}")]
    MediaUpload(String),

    #[error("Unsupported message type: {0}")]
    UnsupportedMessageType(String),

    /// Stored credentials were refused; the user has to log in again
    #[error("Bad credentials: {0}")]
    BadCredentials(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid login flow: {0}")]
    InvalidLoginFlow(String),

    /// The host refused a translated event
    #[error("Event delivery failed: {0}")]
    Delivery(String),
}

impl BridgeError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn remote_api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteApi {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn media_fetch(msg: impl Into<String>) -> Self {
        Self::MediaFetch(msg.into())
    }

    pub fn media_upload(msg: impl Into<String>) -> Self {
        Self::MediaUpload(msg.into())
    }

    pub fn unsupported_message_type(msg_type: impl Into<String>) -> Self {
        Self::UnsupportedMessageType(msg_type.into())
    }

    pub fn bad_credentials(msg: impl Into<String>) -> Self {
        Self::BadCredentials(msg.into())
    }

    pub fn websocket(msg: impl Into<String>) -> Self {
        Self::WebSocket(msg.into())
    }

    pub fn connection_closed(msg: impl Into<String>) -> Self {
        Self::ConnectionClosed(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn invalid_login_flow(flow_id: impl Into<String>) -> Self {
        Self::InvalidLoginFlow(flow_id.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Whether retrying the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::WebSocket(_) | Self::ConnectionClosed(_)
        )
    }

    pub fn needs_relogin(&self) -> bool {
        matches!(self, Self::BadCredentials(_))
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Protocol(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for BridgeError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;
        match e {
            WsError::ConnectionClosed | WsError::AlreadyClosed => {
                Self::ConnectionClosed(e.to_string())
            }
            other => Self::WebSocket(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(e: toml::de::Error) -> Self {
        Self::Configuration(e.to_string())
    }
}
