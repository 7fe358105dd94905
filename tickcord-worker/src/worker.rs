//! Relay worker event loop
//!
//! A single cooperative loop owns the gateway socket: a watch timer polls
//! the kill flag, a relay timer pumps the outbound queues once the session
//! is ready, and gateway dispatches feed the inbound queues. Startup
//! failure is fatal — the worker never retries and the host observes
//! permanent non-readiness.

use crate::gateway::{self, GatewayOp, GatewayPayload, MessageEvent};
use crate::rest::{ChannelSink, DiscordRest};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::thread::JoinHandle;
use tickcord_core::config::{ChannelRoute, DiscordConfig};
use tickcord_core::sanitize::{sanitize, MAX_MESSAGE_LEN};
use tickcord_core::{Error, RelayBridge, Result, WorkerSignals, WorkerState};
use tokio::net::TcpStream;
use tokio::time::{interval, interval_at, Duration, Instant, Interval};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

/// Watch-timer and relay-timer period.
const TIMER_INTERVAL: Duration = Duration::from_secs(1);

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;
type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Immutable connection configuration, captured at worker construction.
#[derive(Debug, Clone)]
pub struct ConnectionTarget {
    pub token: String,
    pub activity: String,
    pub gateway_url: String,
    pub intents: u64,
    pub console: ChannelRoute,
    pub chat: ChannelRoute,
}

impl From<DiscordConfig> for ConnectionTarget {
    fn from(config: DiscordConfig) -> Self {
        Self {
            token: config.token,
            activity: config.activity,
            gateway_url: config.gateway_url,
            intents: config.intents,
            console: config.console,
            chat: config.chat,
        }
    }
}

/// Handle held by the host side: lifecycle observation plus the kill flag.
pub struct WorkerHandle {
    signals: Arc<WorkerSignals>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn signals(&self) -> Arc<WorkerSignals> {
        Arc::clone(&self.signals)
    }

    pub fn state(&self) -> WorkerState {
        self.signals.state()
    }

    pub fn is_ready(&self) -> bool {
        self.signals.is_ready()
    }

    pub fn is_running(&self) -> bool {
        self.signals.is_running()
    }

    /// Request cooperative shutdown; observed at the next watch tick.
    pub fn request_shutdown(&self) {
        self.signals.request_shutdown();
    }

    /// Wait for the worker thread to exit.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Spawn the worker on its own OS thread with a current-thread runtime.
///
/// The host never touches the runtime; the returned handle and the relay
/// bridge are the only contact surface.
pub fn spawn(target: ConnectionTarget, bridge: Arc<RelayBridge>) -> std::io::Result<WorkerHandle> {
    let signals = Arc::new(WorkerSignals::new());
    let worker_signals = Arc::clone(&signals);

    let thread = std::thread::Builder::new()
        .name("tickcord-worker".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to build worker runtime: {e}");
                    worker_signals.set_state(WorkerState::Stopped);
                    return;
                }
            };

            let rest = match DiscordRest::new(target.token.clone()) {
                Ok(rest) => rest,
                Err(e) => {
                    error!("{e}");
                    worker_signals.set_state(WorkerState::Stopped);
                    return;
                }
            };

            let worker = RelayWorker::new(target, bridge, Arc::clone(&worker_signals));
            if let Err(e) = runtime.block_on(worker.run(&rest)) {
                // Fatal by contract: no reconnect, no retry. The host sees
                // permanent non-readiness through the signals.
                error!("Discord session failed permanently: {e}");
            }
        })?;

    Ok(WorkerHandle {
        signals,
        thread: Some(thread),
    })
}

/// The worker runtime: owns the gateway session and pumps the bridge.
pub struct RelayWorker {
    target: ConnectionTarget,
    bridge: Arc<RelayBridge>,
    signals: Arc<WorkerSignals>,
}

impl RelayWorker {
    pub fn new(
        target: ConnectionTarget,
        bridge: Arc<RelayBridge>,
        signals: Arc<WorkerSignals>,
    ) -> Self {
        Self {
            target,
            bridge,
            signals,
        }
    }

    /// Run the session to completion. Always leaves the state at `Stopped`.
    pub async fn run(&self, sink: &dyn ChannelSink) -> Result<()> {
        let result = self.run_session(sink).await;
        self.signals.set_state(WorkerState::Stopped);
        result
    }

    async fn run_session(&self, sink: &dyn ChannelSink) -> Result<()> {
        self.signals.set_state(WorkerState::Starting);
        info!("Connecting to gateway at {}", self.target.gateway_url);

        let (ws_stream, _) = connect_async(self.target.gateway_url.as_str())
            .await
            .map_err(|e| Error::Gateway(format!("Connection failed: {e}")))?;
        let (mut write, mut read) = ws_stream.split();

        let mut seq: Option<u64> = None;
        let mut heartbeat: Option<Interval> = None;
        let mut watch = interval(TIMER_INTERVAL);
        let mut relay = interval(TIMER_INTERVAL);

        loop {
            tokio::select! {
                _ = watch.tick() => {
                    if self.signals.shutdown_requested() {
                        info!("Shutdown requested, closing session");
                        self.signals.set_state(WorkerState::ShuttingDown);
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                }
                _ = relay.tick() => {
                    self.pump_if_ready(sink).await;
                }
                _ = tick_opt(&mut heartbeat) => {
                    write
                        .send(WsMessage::Text(gateway::heartbeat(seq)))
                        .await
                        .map_err(|e| Error::Gateway(format!("Heartbeat write failed: {e}")))?;
                }
                event = read.next() => {
                    if !self.handle_socket_event(event, &mut write, &mut seq, &mut heartbeat).await? {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns Ok(false) when the loop should exit cleanly.
    async fn handle_socket_event(
        &self,
        event: Option<
            std::result::Result<WsMessage, tokio_tungstenite::tungstenite::Error>,
        >,
        write: &mut WsWriter,
        seq: &mut Option<u64>,
        heartbeat: &mut Option<Interval>,
    ) -> Result<bool> {
        match event {
            Some(Ok(WsMessage::Text(text))) => {
                self.handle_gateway_event(&text, write, seq, heartbeat)
                    .await?;
                Ok(true)
            }
            Some(Ok(WsMessage::Close(frame))) => {
                if self.signals.shutdown_requested() {
                    return Ok(false);
                }
                let detail = frame
                    .map(|f| format!("code {} ({})", f.code, f.reason))
                    .unwrap_or_else(|| "no close frame".to_string());
                Err(Error::Gateway(format!("Session closed by remote: {detail}")))
            }
            Some(Ok(_)) => Ok(true),
            Some(Err(e)) => Err(Error::Gateway(format!("WebSocket error: {e}"))),
            None => {
                if self.signals.shutdown_requested() {
                    Ok(false)
                } else {
                    Err(Error::Gateway("Stream ended unexpectedly".to_string()))
                }
            }
        }
    }

    async fn handle_gateway_event(
        &self,
        text: &str,
        write: &mut WsWriter,
        seq: &mut Option<u64>,
        heartbeat: &mut Option<Interval>,
    ) -> Result<()> {
        let payload: GatewayPayload = serde_json::from_str(text)
            .map_err(|e| Error::Gateway(format!("Failed to parse payload: {e}")))?;

        if let Some(s) = payload.s {
            *seq = Some(s);
        }

        match GatewayOp::from_u8(payload.op) {
            Some(GatewayOp::Hello) => {
                let interval_ms = payload
                    .d
                    .as_ref()
                    .and_then(|d| d.get("heartbeat_interval"))
                    .and_then(|v| v.as_u64())
                    .unwrap_or(45000);
                let period = Duration::from_millis(interval_ms);
                *heartbeat = Some(interval_at(Instant::now() + period, period));

                write
                    .send(WsMessage::Text(gateway::identify(
                        &self.target.token,
                        self.target.intents,
                    )))
                    .await
                    .map_err(|e| Error::Gateway(format!("Identify write failed: {e}")))?;
            }
            Some(GatewayOp::Heartbeat) => {
                write
                    .send(WsMessage::Text(gateway::heartbeat(*seq)))
                    .await
                    .map_err(|e| Error::Gateway(format!("Heartbeat write failed: {e}")))?;
            }
            Some(GatewayOp::Dispatch) => match payload.t.as_deref() {
                Some("READY") => {
                    info!("Gateway session ready");
                    self.signals.set_state(WorkerState::Ready);
                    self.signals.set_ready();

                    write
                        .send(WsMessage::Text(gateway::presence(&self.target.activity)))
                        .await
                        .map_err(|e| Error::Gateway(format!("Presence write failed: {e}")))?;
                    self.signals.set_state(WorkerState::Running);
                }
                Some("MESSAGE_CREATE") => {
                    if let Some(d) = payload.d {
                        match serde_json::from_value::<MessageEvent>(d) {
                            Ok(msg) => self.route_inbound(&msg),
                            Err(e) => debug!("Ignoring unparseable message event: {e}"),
                        }
                    }
                }
                _ => {}
            },
            Some(GatewayOp::Reconnect) => {
                // No reconnect policy: a lost session is a stopped worker.
                return Err(Error::Gateway("Remote requested reconnect".to_string()));
            }
            Some(GatewayOp::InvalidSession) => {
                return Err(Error::Gateway("Session rejected as invalid".to_string()));
            }
            _ => {}
        }

        Ok(())
    }

    /// Route a remote message event into the inbound queues.
    ///
    /// Bot authors, non-normal message types, empty content and unknown
    /// channels are all dropped silently.
    fn route_inbound(&self, msg: &MessageEvent) {
        if msg.author.bot || msg.kind != 0 || msg.content.is_empty() {
            return;
        }

        if msg.channel_id == self.target.console.channel_id {
            self.bridge.console_inbound.push(msg.content.clone());
        } else if msg.channel_id == self.target.chat.channel_id {
            self.bridge
                .chat_inbound
                .push(format!("[{}] {}", msg.author.display_name(), msg.content));
        }
    }

    /// Relay-timer body: pump only once the session handshake completed.
    async fn pump_if_ready(&self, sink: &dyn ChannelSink) {
        if self.signals.is_ready() {
            self.pump_outbound(sink).await;
        }
    }

    /// Drain both outbound queues and send what survives sanitization.
    ///
    /// A failed send is logged and skipped; later messages in the same
    /// batch are still attempted.
    async fn pump_outbound(&self, sink: &dyn ChannelSink) {
        for raw in self.bridge.console_outbound.drain_all() {
            let message = sanitize(&raw);
            if message.is_empty() || message.chars().count() >= MAX_MESSAGE_LEN {
                continue;
            }
            let fenced = format!("```{message}```");
            if let Err(e) = sink
                .send_message(&self.target.console.channel_id, &fenced)
                .await
            {
                warn!("Console relay send failed: {e}");
            }
        }

        for raw in self.bridge.chat_outbound.drain_all() {
            let message = sanitize(&raw);
            if message.is_empty() || message.chars().count() >= MAX_MESSAGE_LEN {
                continue;
            }
            if let Err(e) = sink
                .send_message(&self.target.chat.channel_id, &message)
                .await
            {
                warn!("Chat relay send failed: {e}");
            }
        }
    }
}

async fn tick_opt(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
