//! Local stand-ins for the gateway process.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::time::sleep;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use zalo_core::config::{BridgeConfig, ReconnectConfig};
use zalo_core::test::mocks::{MockEventSink, MockMediaStore, MockStateSink};
use zalo_core::HostContext;

/// What the fake stream does on one connection.
#[derive(Debug, Clone)]
pub enum Step {
    Send(String),
    SendBinary(Vec<u8>),
    Pause(Duration),
    /// Sends a close frame and drops the connection
    Close,
}

/// WebSocket gateway replaying one script per accepted connection.
///
/// A connection with no script left stays open and silent. After
/// `max_connections` accepts the listener is dropped, so further dials are
/// refused.
pub struct FakeStream {
    pub addr: SocketAddr,
    accepted: Arc<AtomicUsize>,
}

impl FakeStream {
    pub async fn start(scripts: Vec<Vec<Step>>, max_connections: Option<usize>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let scripts = Arc::new(Mutex::new(VecDeque::from(scripts)));

        let counter = accepted.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _peer)) = listener.accept().await else {
                    return;
                };
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                let script = scripts.lock().unwrap().pop_front().unwrap_or_default();

                tokio::spawn(async move {
                    let Ok(ws) = accept_async(stream).await else {
                        return;
                    };
                    let (mut tx, mut rx) = ws.split();
                    for step in script {
                        match step {
                            Step::Send(text) => {
                                if tx.send(Message::Text(text)).await.is_err() {
                                    return;
                                }
                            }
                            Step::SendBinary(data) => {
                                if tx.send(Message::Binary(data)).await.is_err() {
                                    return;
                                }
                            }
                            Step::Pause(d) => sleep(d).await,
                            Step::Close => {
                                let _ = tx.send(Message::Close(None)).await;
                                return;
                            }
                        }
                    }
                    // Hold the connection until the client goes away.
                    while let Some(Ok(_)) = rx.next().await {}
                });

                if max_connections.is_some_and(|max| n >= max) {
                    return;
                }
            }
        });

        Self { addr, accepted }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn config(url: &str, reconnect: ReconnectConfig) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.gateway.url = url.to_string();
    config.gateway.connect_timeout_secs = 2;
    config.gateway.request_timeout_secs = 5;
    config.reconnect = reconnect;
    config
}

pub fn fast_reconnect(max_attempts: u32) -> ReconnectConfig {
    ReconnectConfig {
        initial_backoff_ms: 10,
        max_backoff_ms: 40,
        max_attempts,
    }
}

pub struct Host {
    pub events: MockEventSink,
    pub states: MockStateSink,
    pub media: MockMediaStore,
}

impl Host {
    pub fn new() -> Self {
        Self::with_events(MockEventSink::new())
    }

    pub fn with_events(events: MockEventSink) -> Self {
        Self {
            events,
            states: MockStateSink::new(),
            media: MockMediaStore::new(),
        }
    }

    pub fn context(&self) -> HostContext {
        HostContext::new(
            Arc::new(self.events.clone()),
            Arc::new(self.states.clone()),
            Arc::new(self.media.clone()),
        )
    }
}

pub fn frame(kind: &str, data: Value) -> String {
    json!({"type": kind, "data": data, "timestamp": 1_700_000_000_000i64}).to_string()
}

pub fn text_frame(msg_id: &str, sender: &str, content: &str) -> String {
    frame(
        "message",
        json!({
            "msgId": msg_id,
            "content": content,
            "threadId": "t1",
            "threadType": 0,
            "senderId": sender,
            "isSelf": false,
            "timestamp": 1_700_000_000_000i64,
        }),
    )
}

pub fn self_frame(msg_id: &str) -> String {
    frame(
        "message",
        json!({
            "msgId": msg_id,
            "content": "echo",
            "threadId": "t1",
            "threadType": 0,
            "senderId": "me",
            "isSelf": true,
        }),
    )
}
