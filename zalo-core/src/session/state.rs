use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of one session's gateway connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    /// Socket open and the read loop running
    Connected,
    /// Read failed; redialing with backoff
    Reconnecting,
}

impl SessionState {
    fn as_u8(self) -> u8 {
        match self {
            Self::Disconnected => 0,
            Self::Connecting => 1,
            Self::Connected => 2,
            Self::Reconnecting => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Reconnecting,
            _ => Self::Disconnected,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "disconnected"),
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Connected => write!(f, "connected"),
            SessionState::Reconnecting => write!(f, "reconnecting"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct AtomicSessionState(AtomicU8);

impl AtomicSessionState {
    pub(crate) fn new(state: SessionState) -> Self {
        Self(AtomicU8::new(state.as_u8()))
    }

    pub(crate) fn load(&self) -> SessionState {
        SessionState::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub(crate) fn store(&self, state: SessionState) {
        self.0.store(state.as_u8(), Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip() {
        let state = AtomicSessionState::new(SessionState::Disconnected);
        for s in [
            SessionState::Connecting,
            SessionState::Connected,
            SessionState::Reconnecting,
            SessionState::Disconnected,
        ] {
            state.store(s);
            assert_eq!(state.load(), s);
        }
        assert_eq!(SessionState::Reconnecting.to_string(), "reconnecting");
    }
}
