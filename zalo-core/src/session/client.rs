//! # Session client
//!
//! One [`ZaloClient`] per logged-in remote account. `connect` restores the
//! gateway session, opens the event stream and spawns a supervised read loop;
//! `disconnect` cancels that loop, waits for it to finish and closes the
//! socket.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use zalo_traits::{BridgeStateSink, MediaStore, RemoteEventSink};
use zalo_types::{BridgeState, LoginMetadata};

use super::reconnect::ReconnectPolicy;
use super::socket::{GatewaySocket, SocketSlot};
use super::state::{AtomicSessionState, SessionState};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::gateway::GatewayClient;
use crate::translate::{EventTranslator, GatewayEnvelope};

/// Host collaborators a session reports to.
#[derive(Clone)]
pub struct HostContext {
    pub events: Arc<dyn RemoteEventSink>,
    pub states: Arc<dyn BridgeStateSink>,
    pub media: Arc<dyn MediaStore>,
}

impl HostContext {
    pub fn new(
        events: Arc<dyn RemoteEventSink>,
        states: Arc<dyn BridgeStateSink>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            events,
            states,
            media,
        }
    }
}

struct Supervisor {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub(crate) struct SessionInner {
    pub(crate) metadata: LoginMetadata,
    pub(crate) gateway: GatewayClient,
    pub(crate) translator: EventTranslator,
    events: Arc<dyn RemoteEventSink>,
    states: Arc<dyn BridgeStateSink>,
    policy: ReconnectPolicy,
    connect_timeout: Duration,
    socket: SocketSlot,
    live: AtomicBool,
    state: AtomicSessionState,
    supervisor: tokio::sync::Mutex<Option<Supervisor>>,
}

enum LoopExit {
    Cancelled,
    /// The slot was emptied under us
    SocketCleared,
    ReadFailed(BridgeError),
}

enum ReconnectOutcome {
    Restored,
    Cancelled,
    Exhausted,
}

pub struct ZaloClient {
    inner: Arc<SessionInner>,
}

impl ZaloClient {
    pub fn new(metadata: LoginMetadata, config: &BridgeConfig, host: HostContext) -> BridgeResult<Self> {
        let gateway = GatewayClient::new(&config.gateway)?;
        let translator = EventTranslator::new(
            gateway.clone(),
            host.media,
            metadata.user_id.clone(),
            config,
        )?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                metadata,
                gateway,
                translator,
                events: host.events,
                states: host.states,
                policy: ReconnectPolicy::from(&config.reconnect),
                connect_timeout: config.gateway.connect_timeout(),
                socket: SocketSlot::new(),
                live: AtomicBool::new(false),
                state: AtomicSessionState::new(SessionState::Disconnected),
                supervisor: tokio::sync::Mutex::new(None),
            }),
        })
    }

    pub(crate) fn inner(&self) -> &SessionInner {
        &self.inner
    }

    /// Login record this session was created from.
    pub fn metadata(&self) -> &LoginMetadata {
        &self.inner.metadata
    }

    /// HTTP client for the session's gateway.
    pub fn gateway(&self) -> &GatewayClient {
        &self.inner.gateway
    }

    /// Converter between gateway payloads and host events.
    pub fn translator(&self) -> &EventTranslator {
        &self.inner.translator
    }

    /// True while a read loop owns a live socket.
    pub fn is_logged_in(&self) -> bool {
        self.inner.live.load(Ordering::SeqCst)
    }

    /// Current connection state.
    pub fn session_state(&self) -> SessionState {
        self.inner.state.load()
    }

    /// Restores the remote session and starts streaming events.
    ///
    /// Fails with [`BridgeError::BadCredentials`] when the stored cookie is
    /// refused (no socket is opened), or with a transport error when the
    /// stream cannot be opened. Retrying is up to the caller. Either failure
    /// tears down any loop left from an earlier `connect`.
    pub async fn connect(&self) -> BridgeResult<()> {
        let inner = &self.inner;
        inner.state.store(SessionState::Connecting);
        inner.states.send_state(BridgeState::connecting());

        if inner.metadata.has_cookie() {
            let restored = inner
                .gateway
                .login_cookie(
                    &inner.metadata.cookie,
                    &inner.metadata.imei,
                    &inner.metadata.user_agent,
                )
                .await;
            if let Err(e) = restored {
                error!(error = %e, "Failed to restore Zalo session via cookie");
                self.disconnect().await;
                inner.states.send_state(BridgeState::bad_credentials(
                    "zalo-cookie-expired",
                    "Zalo session expired, please re-login",
                ));
                return Err(BridgeError::bad_credentials(e.to_string()));
            }
        }

        // A second connect replaces the running loop.
        self.stop_supervisor().await;

        let url = inner.gateway.websocket_url();
        let socket = match GatewaySocket::dial(&url, inner.connect_timeout).await {
            Ok(socket) => socket,
            Err(e) => {
                error!(error = %e, "Failed to connect WebSocket to gateway");
                self.disconnect().await;
                inner.states.send_state(BridgeState::transient_disconnect(
                    "zalo-ws-connect-failed",
                    e.to_string(),
                ));
                return Err(e);
            }
        };
        inner.socket.install(Arc::new(socket)).await;

        inner.live.store(true, Ordering::SeqCst);
        inner.state.store(SessionState::Connected);
        inner.states.send_state(BridgeState::connected());
        info!(user_id = %inner.metadata.user_id, "Connected to Zalo gateway");

        let token = CancellationToken::new();
        let span = info_span!("zalo_session", user_id = %inner.metadata.user_id);
        let handle = tokio::spawn(supervise(Arc::clone(inner), token.clone()).instrument(span));
        *inner.supervisor.lock().await = Some(Supervisor { token, handle });

        Ok(())
    }

    /// Stops the read loop and closes the socket. Safe to call repeatedly.
    pub async fn disconnect(&self) {
        self.stop_supervisor().await;
        self.inner.live.store(false, Ordering::SeqCst);
        self.inner.socket.close_and_clear().await;
        self.inner.state.store(SessionState::Disconnected);
    }

    /// Best-effort remote logout, then [`Self::disconnect`].
    pub async fn logout_remote(&self) {
        if let Err(e) = self.inner.gateway.logout().await {
            debug!(error = %e, "Gateway logout failed");
        }
        self.disconnect().await;
        self.inner.states.send_state(BridgeState::logged_out());
    }

    pub fn is_this_user(&self, user_id: &str) -> bool {
        !user_id.is_empty() && user_id == self.inner.metadata.user_id
    }

    async fn stop_supervisor(&self) {
        let supervisor = self.inner.supervisor.lock().await.take();
        if let Some(Supervisor { token, handle }) = supervisor {
            token.cancel();
            if let Err(e) = handle.await {
                if e.is_panic() {
                    error!(error = %e, "Session read loop panicked");
                }
            }
        }
    }
}

impl Drop for ZaloClient {
    fn drop(&mut self) {
        if let Ok(mut supervisor) = self.inner.supervisor.try_lock() {
            if let Some(supervisor) = supervisor.take() {
                supervisor.token.cancel();
            }
        }
    }
}

/// Runs read loops until cancelled or until reconnecting gives up.
async fn supervise(inner: Arc<SessionInner>, token: CancellationToken) {
    loop {
        match read_loop(&inner, &token).await {
            LoopExit::Cancelled => {
                debug!("Read loop cancelled");
                return;
            }
            LoopExit::SocketCleared => {
                debug!("Socket cleared, read loop exiting");
                return;
            }
            LoopExit::ReadFailed(e) => {
                warn!(error = %e, "WebSocket read error");
                match reconnect(&inner, &token).await {
                    ReconnectOutcome::Restored => continue,
                    ReconnectOutcome::Cancelled => return,
                    ReconnectOutcome::Exhausted => {
                        inner.live.store(false, Ordering::SeqCst);
                        inner.state.store(SessionState::Disconnected);
                        inner.socket.close_and_clear().await;
                        inner.states.send_state(BridgeState::unknown_error(
                            "zalo-ws-reconnect-failed",
                            "Lost connection to the Zalo gateway",
                        ));
                        return;
                    }
                }
            }
        }
    }
}

async fn read_loop(inner: &SessionInner, token: &CancellationToken) -> LoopExit {
    loop {
        if token.is_cancelled() {
            return LoopExit::Cancelled;
        }
        let Some(socket) = inner.socket.current().await else {
            return LoopExit::SocketCleared;
        };

        let frame = tokio::select! {
            biased;
            _ = token.cancelled() => return LoopExit::Cancelled,
            frame = socket.read_frame() => frame,
        };

        let text = match frame {
            Ok(Some(text)) => text,
            Ok(None) => continue,
            Err(_) if token.is_cancelled() => return LoopExit::Cancelled,
            Err(e) => return LoopExit::ReadFailed(e),
        };

        let envelope = match GatewayEnvelope::parse(&text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Failed to parse gateway event");
                continue;
            }
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => return LoopExit::Cancelled,
            _ = dispatch(inner, &envelope) => {}
        }
    }
}

/// Translates one frame and hands the result to the host, in receipt order.
async fn dispatch(inner: &SessionInner, envelope: &GatewayEnvelope) {
    match inner.translator.translate(envelope).await {
        Ok(Some(event)) => {
            let kind = event.kind();
            if let Err(e) = inner.events.queue_remote_event(event).await {
                let e = BridgeError::delivery(e.to_string());
                error!(?kind, error = %e, "Host refused remote event");
            }
        }
        Ok(None) => {}
        Err(e) => warn!(kind = %envelope.kind, error = %e, "Failed to convert gateway event"),
    }
}

async fn reconnect(inner: &SessionInner, token: &CancellationToken) -> ReconnectOutcome {
    inner.state.store(SessionState::Reconnecting);
    inner.states.send_state(BridgeState::transient_disconnect(
        "zalo-ws-disconnected",
        "Connection to the Zalo gateway lost, reconnecting",
    ));

    let url = inner.gateway.websocket_url();
    for (attempt, delay) in (1u32..).zip(inner.policy.delays()) {
        tokio::select! {
            biased;
            _ = token.cancelled() => return ReconnectOutcome::Cancelled,
            _ = sleep(delay) => {}
        }

        info!(attempt, "Attempting WebSocket reconnect");
        let dialed = tokio::select! {
            biased;
            _ = token.cancelled() => return ReconnectOutcome::Cancelled,
            dialed = GatewaySocket::dial(&url, inner.connect_timeout) => dialed,
        };

        match dialed {
            Ok(socket) => {
                inner.socket.install(Arc::new(socket)).await;
                inner.state.store(SessionState::Connected);
                inner.states.send_state(BridgeState::connected());
                info!(attempt, "WebSocket reconnected");
                return ReconnectOutcome::Restored;
            }
            Err(e) => warn!(attempt, error = %e, "Reconnect attempt failed"),
        }
    }

    error!(
        attempts = inner.policy.max_attempts,
        "WebSocket reconnect failed after {} attempts", inner.policy.max_attempts
    );
    ReconnectOutcome::Exhausted
}
