//! # Zalo Bridge Core
//!
//! Remote-session connection manager for a Zalo ↔ Matrix bridge.
//!
//! The proprietary protocol lives in an external gateway process; this crate
//! talks to it over HTTP (commands) and WebSocket (events) and adapts both
//! directions to the hosting framework's model.
//!
//! ## Architecture
//!
//! - **Gateway**: typed HTTP client for the gateway's command API
//! - **Translate**: inbound stream frames → [`RemoteEvent`], outbound actions → gateway calls
//! - **Session**: per-login connection lifecycle with supervised reconnect
//! - **Connector**: bridge metadata, QR login and the [`NetworkApi`] callbacks
//! - **Config**: layered TOML + environment configuration
//!
//! ```text
//! host ──NetworkApi──▶ ZaloClient ──HTTP──▶ gateway
//!  ▲                       │
//!  └──RemoteEventSink◀─────┴──WebSocket◀── gateway
//! ```
//!
//! Portal keys, events and the other data types live in `zalo-types`; the
//! host-side traits in `zalo-traits`.
//!
//! [`RemoteEvent`]: zalo_types::RemoteEvent
//! [`NetworkApi`]: connector::NetworkApi

pub mod config;
pub mod connector;
pub mod error;
pub mod gateway;
pub mod media;
pub mod session;
pub mod translate;

#[cfg(any(test, feature = "test-utils"))]
pub mod test;

pub use config::{BridgeConfig, ConfigLoader};
pub use connector::{LoginProcess, NetworkApi, QrLogin, ZaloConnector};
pub use error::{BridgeError, BridgeResult};
pub use gateway::GatewayClient;
pub use session::{HostContext, SessionState, ZaloClient};
pub use translate::EventTranslator;

pub use zalo_traits;
pub use zalo_types;
