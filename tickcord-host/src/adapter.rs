//! Host scheduler adapter
//!
//! Periodic tasks on the host tick scheduler: capture console output into
//! the outbound queues, dispatch inbound messages back into the server, and
//! orchestrate the startup notice and the blocking shutdown drain.

use crate::host::{HostEvent, HostServer, TickScheduler};
use std::sync::Arc;
use std::time::Duration;
use tickcord_core::config::HostConfig;
use tickcord_core::{RelayBridge, WorkerSignals};
use tracing::info;

/// Poll interval of the shutdown drain wait.
const DRAIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Bridges the host tick scheduler and the relay queues.
pub struct SchedulerAdapter {
    bridge: Arc<RelayBridge>,
    signals: Arc<WorkerSignals>,
    host: Arc<dyn HostServer>,
    config: HostConfig,
}

impl SchedulerAdapter {
    pub fn new(
        bridge: Arc<RelayBridge>,
        signals: Arc<WorkerSignals>,
        host: Arc<dyn HostServer>,
        config: HostConfig,
    ) -> Self {
        Self {
            bridge,
            signals,
            host,
            config,
        }
    }

    /// Register the capture and dispatch tasks on the host scheduler.
    ///
    /// Console capture only begins after the configured settle delay so
    /// buffered startup output does not flood the remote channel.
    pub fn register(self: &Arc<Self>, scheduler: &dyn TickScheduler) {
        let host = Arc::clone(&self.host);
        scheduler.schedule_delayed(
            self.config.capture_delay_ticks,
            Box::new(move || host.begin_console_capture()),
        );

        let adapter = Arc::clone(self);
        scheduler.schedule_repeating(
            self.config.capture_delay_ticks,
            self.config.capture_period_ticks,
            Box::new(move || adapter.capture_tick()),
        );

        let adapter = Arc::clone(self);
        scheduler.schedule_repeating(
            self.config.capture_delay_ticks,
            self.config.dispatch_period_ticks,
            Box::new(move || adapter.dispatch_tick()),
        );
    }

    /// Fast task: enqueue newly produced console output, but only while the
    /// worker session is confirmed running.
    pub fn capture_tick(&self) {
        if !self.signals.is_running() {
            return;
        }

        let output = self.host.take_console_output();
        if output.is_empty() {
            return;
        }
        self.bridge.console_outbound.push(output);
    }

    /// Slow task: drain inbound queues back into the server. Console
    /// messages become commands, chat messages become broadcasts.
    pub fn dispatch_tick(&self) {
        for command in self.bridge.console_inbound.drain_all() {
            if command.is_empty() {
                continue;
            }
            self.host.dispatch_console_command(&command);
        }

        for message in self.bridge.chat_inbound.drain_all() {
            if message.is_empty() {
                continue;
            }
            self.host.broadcast_message(&message);
        }
    }

    /// Forward a host domain event as a formatted chat line.
    pub fn handle_event(&self, event: HostEvent) {
        let line = match event {
            HostEvent::PlayerJoined { name } => format!("{name} joined the server"),
            HostEvent::PlayerQuit { name } => format!("{name} left the server"),
            HostEvent::PlayerChat { name, message } => format!("[{name}] {message}"),
            HostEvent::PlayerDeath { name } => format!("{name} died"),
        };
        self.bridge.chat_outbound.push(line);
    }

    /// Announce host startup completion on the chat channel.
    pub fn notify_started(&self) {
        self.bridge.chat_outbound.push("Server started".to_string());
    }

    /// Announce shutdown, then block until the worker has flushed both
    /// host-to-remote queues before requesting worker shutdown.
    ///
    /// There is deliberately no timeout: the contract is best-effort
    /// delivery of the final notice, and a worker whose pump has stalled
    /// (or that never became ready) will stall host shutdown with it.
    pub fn begin_shutdown(&self) {
        self.bridge.chat_outbound.push("Server stopping".to_string());

        info!("Waiting for outbound relay queues to drain");
        while self.bridge.outbound_depth() > 0 {
            std::thread::sleep(DRAIN_POLL_INTERVAL);
        }

        self.signals.request_shutdown();
    }
}
