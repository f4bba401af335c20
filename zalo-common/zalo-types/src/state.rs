use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection state reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateEvent {
    Connecting,
    Connected,
    TransientDisconnect,
    BadCredentials,
    UnknownError,
    LoggedOut,
}

impl fmt::Display for StateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
            Self::TransientDisconnect => "TRANSIENT_DISCONNECT",
            Self::BadCredentials => "BAD_CREDENTIALS",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::LoggedOut => "LOGGED_OUT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeState {
    pub state_event: StateEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BridgeState {
    pub fn new(state_event: StateEvent) -> Self {
        Self {
            state_event,
            error: None,
            message: None,
        }
    }

    pub fn connecting() -> Self {
        Self::new(StateEvent::Connecting)
    }

    pub fn connected() -> Self {
        Self::new(StateEvent::Connected)
    }

    pub fn logged_out() -> Self {
        Self::new(StateEvent::LoggedOut)
    }

    pub fn transient_disconnect(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StateEvent::TransientDisconnect).with_error(error, message)
    }

    pub fn bad_credentials(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StateEvent::BadCredentials).with_error(error, message)
    }

    pub fn unknown_error(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StateEvent::UnknownError).with_error(error, message)
    }

    pub fn with_error(mut self, error: impl Into<String>, message: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_credentials_state() {
        let state = BridgeState::bad_credentials("zalo-cookie-expired", "please re-login");
        assert_eq!(state.state_event, StateEvent::BadCredentials);
        assert_eq!(state.error.as_deref(), Some("zalo-cookie-expired"));
        assert_eq!(state.state_event.to_string(), "BAD_CREDENTIALS");
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_value(BridgeState::connected()).unwrap();
        assert_eq!(json, serde_json::json!({"state_event": "CONNECTED"}));
    }
}
