//! # Session Connection Manager
//!
//! Connection lifecycle of one logged-in account: session restore, the
//! gateway event stream, reconnect with backoff and shutdown.

mod client;
pub mod reconnect;
pub mod socket;
pub mod state;

pub use client::{HostContext, ZaloClient};
pub use reconnect::ReconnectPolicy;
pub use socket::{GatewaySocket, SocketSlot};
pub use state::SessionState;
