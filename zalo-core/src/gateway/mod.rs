//! # Gateway
//!
//! The gateway is the external process that speaks the proprietary Zalo
//! protocol. It exposes request/response calls over HTTP and an event stream
//! over WebSocket at `/ws`.

mod client;
pub mod lenient;
pub mod types;

pub use client::GatewayClient;
pub use types::{
    CookieLoginResponse, ErrorResponse, GatewayGroup, GatewayGroupMember, GatewayUser,
    HealthResponse, LoginSessionResponse, QrLoginResponse, SendResponse,
};
