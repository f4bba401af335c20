//! The gateway WebSocket and the per-session slot that owns it.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::error::{BridgeError, BridgeResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct GatewaySocket {
    url: String,
    reader: Mutex<SplitStream<WsStream>>,
    writer: Mutex<SplitSink<WsStream, Message>>,
}

impl GatewaySocket {
    pub async fn dial(url: &str, connect_timeout: Duration) -> BridgeResult<Self> {
        let (stream, _response) = timeout(connect_timeout, connect_async(url))
            .await
            .map_err(|_| {
                BridgeError::transport(format!(
                    "connect {} timed out after {:?}",
                    url, connect_timeout
                ))
            })?
            .map_err(|e| BridgeError::transport(format!("connect {}: {}", url, e)))?;

        debug!(url, "Gateway WebSocket connected");
        let (writer, reader) = stream.split();
        Ok(Self {
            url: url.to_string(),
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Reads the next frame.
    ///
    /// `Ok(Some(text))` for a data frame, `Ok(None)` for control frames and
    /// undecodable binary frames, and an error once the stream is closed or
    /// broken.
    pub async fn read_frame(&self) -> BridgeResult<Option<String>> {
        let mut reader = self.reader.lock().await;
        match reader.next().await {
            Some(Ok(Message::Text(text))) => Ok(Some(text)),
            Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
                Ok(text) => Ok(Some(text)),
                Err(_) => {
                    warn!("Ignoring non UTF-8 binary frame");
                    Ok(None)
                }
            },
            Some(Ok(Message::Close(frame))) => Err(BridgeError::connection_closed(format!(
                "closed by gateway: {:?}",
                frame
            ))),
            Some(Ok(_)) => Ok(None),
            Some(Err(e)) => Err(e.into()),
            None => Err(BridgeError::connection_closed("stream ended")),
        }
    }

    pub async fn close(&self) {
        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.send(Message::Close(None)).await {
            debug!(error = %e, "Close frame not sent");
        }
        let _ = writer.close().await;
    }
}

/// Holds at most one live socket for a session.
///
/// The lock is held only for the duration of each access; reads on the socket
/// happen on a cloned handle outside the lock.
#[derive(Default)]
pub struct SocketSlot {
    inner: Mutex<Option<Arc<GatewaySocket>>>,
}

impl SocketSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<Arc<GatewaySocket>> {
        self.inner.lock().await.clone()
    }

    /// Installs `socket`, closing the one it replaces.
    pub async fn install(&self, socket: Arc<GatewaySocket>) {
        let mut slot = self.inner.lock().await;
        if let Some(previous) = slot.replace(socket) {
            previous.close().await;
        }
    }

    pub async fn close_and_clear(&self) {
        let mut slot = self.inner.lock().await;
        if let Some(socket) = slot.take() {
            socket.close().await;
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_none()
    }
}
