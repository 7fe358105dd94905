//! End-to-end worker session against a scripted local gateway.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tickcord_core::config::ChannelRoute;
use tickcord_core::{RelayBridge, Result, WorkerSignals, WorkerState};
use tickcord_worker::{ChannelSink, ConnectionTarget, RelayWorker};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Duration};
use tokio_tungstenite::{accept_async, tungstenite::Message as WsMessage};

const CONSOLE_CHANNEL: &str = "111";
const CHAT_CHANNEL: &str = "222";

struct RecordingSink {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelSink for RecordingSink {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((channel_id.to_string(), content.to_string()));
        Ok(())
    }
}

/// Scripted gateway: hello, identify handshake, ready, then one console
/// message. Responds to heartbeats and echoes close frames.
async fn spawn_mock_gateway() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock gateway listener");
    let addr = listener.local_addr().expect("get mock gateway address");
    let url = format!("ws://{}", addr);

    let task = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept connection");
        let ws = accept_async(stream).await.expect("websocket handshake");
        let (mut write, mut read) = ws.split();

        let hello = json!({"op": 10, "d": {"heartbeat_interval": 45000}});
        write
            .send(WsMessage::Text(hello.to_string()))
            .await
            .expect("send hello");

        while let Some(Ok(msg)) = read.next().await {
            match msg {
                WsMessage::Text(text) => {
                    let payload: Value = serde_json::from_str(&text).expect("client sends json");
                    match payload["op"].as_u64() {
                        // Identify: confirm the session.
                        Some(2) => {
                            assert_eq!(payload["d"]["token"], "test-token");
                            let ready = json!({
                                "op": 0, "t": "READY", "s": 1,
                                "d": {"session_id": "abc"}
                            });
                            write
                                .send(WsMessage::Text(ready.to_string()))
                                .await
                                .expect("send ready");
                        }
                        // Presence update after ready: deliver an inbound
                        // console command.
                        Some(3) => {
                            let message = json!({
                                "op": 0, "t": "MESSAGE_CREATE", "s": 2,
                                "d": {
                                    "channel_id": CONSOLE_CHANNEL,
                                    "content": "stop",
                                    "type": 0,
                                    "author": {"id": "7", "username": "admin"}
                                }
                            });
                            write
                                .send(WsMessage::Text(message.to_string()))
                                .await
                                .expect("send message event");
                        }
                        // Heartbeat: acknowledge.
                        Some(1) => {
                            let ack = json!({"op": 11});
                            let _ = write.send(WsMessage::Text(ack.to_string())).await;
                        }
                        _ => {}
                    }
                }
                WsMessage::Close(_) => {
                    let _ = write.send(WsMessage::Close(None)).await;
                    break;
                }
                _ => {}
            }
        }
    });

    (url, task)
}

fn target(gateway_url: String) -> ConnectionTarget {
    ConnectionTarget {
        token: "test-token".to_string(),
        activity: "integration test".to_string(),
        gateway_url,
        intents: 33283,
        console: ChannelRoute {
            guild_id: "g".to_string(),
            channel_id: CONSOLE_CHANNEL.to_string(),
        },
        chat: ChannelRoute {
            guild_id: "g".to_string(),
            channel_id: CHAT_CHANNEL.to_string(),
        },
    }
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    timeout(Duration::from_secs(10), async {
        while !condition() {
            sleep(Duration::from_millis(25)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_session_relay_and_shutdown() {
    let (url, gateway_task) = spawn_mock_gateway().await;

    let bridge = RelayBridge::new();
    let signals = Arc::new(WorkerSignals::new());
    let sink = RecordingSink::new();

    let worker = RelayWorker::new(target(url), Arc::clone(&bridge), Arc::clone(&signals));
    let sink_ref = Arc::clone(&sink);
    let run_task = tokio::spawn(async move { worker.run(sink_ref.as_ref()).await });

    // Session handshake completes and the readiness flag goes up.
    let ready_signals = Arc::clone(&signals);
    wait_for(move || ready_signals.is_ready()).await;
    assert!(signals.is_running());

    // The console message scripted by the gateway lands inbound, verbatim.
    let inbound_bridge = Arc::clone(&bridge);
    wait_for(move || inbound_bridge.console_inbound.depth() > 0).await;
    assert_eq!(bridge.console_inbound.drain_all(), vec!["stop".to_string()]);

    // An outbound chat line is pumped to the chat channel, exactly once.
    bridge.chat_outbound.push("PlayerX joined".to_string());
    let pumped_sink = Arc::clone(&sink);
    wait_for(move || !pumped_sink.sent().is_empty()).await;
    let sent = sink.sent();
    assert_eq!(
        sent,
        vec![(CHAT_CHANNEL.to_string(), "PlayerX joined".to_string())]
    );

    // Cooperative shutdown: observed at the next watch tick.
    signals.request_shutdown();
    let result = timeout(Duration::from_secs(10), run_task)
        .await
        .expect("worker exits after kill flag")
        .expect("worker task not cancelled");
    assert!(result.is_ok());
    assert_eq!(signals.state(), WorkerState::Stopped);

    let _ = timeout(Duration::from_secs(5), gateway_task).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connect_failure_is_fatal_and_never_ready() {
    // Grab a port and release it so the connect is refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let bridge = RelayBridge::new();
    let signals = Arc::new(WorkerSignals::new());
    let sink = RecordingSink::new();

    let worker = RelayWorker::new(
        target(format!("ws://{}", addr)),
        Arc::clone(&bridge),
        Arc::clone(&signals),
    );
    let result = worker.run(sink.as_ref()).await;

    assert!(result.is_err());
    assert!(!signals.is_ready());
    assert_eq!(signals.state(), WorkerState::Stopped);
    assert!(sink.sent().is_empty());
}
