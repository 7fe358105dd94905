//! Trait boundary to the embedding game server
//!
//! The concrete server (its scheduler, console capture and player events)
//! lives outside this crate; these traits are the whole contract.

/// A task body run by the host scheduler on its tick thread.
pub type TickTask = Box<dyn FnMut() + Send>;

/// The host's fixed-rate scheduler. Delays and periods are in host ticks.
pub trait TickScheduler {
    /// Run `task` once after `delay_ticks`.
    fn schedule_delayed(&self, delay_ticks: u64, task: TickTask);

    /// Run `task` every `period_ticks`, starting after `delay_ticks`.
    fn schedule_repeating(&self, delay_ticks: u64, period_ticks: u64, task: TickTask);
}

/// Actions the adapter performs against the running server.
pub trait HostServer: Send + Sync {
    /// Start buffering console output for later capture.
    fn begin_console_capture(&self);

    /// Return console output produced since the last call, empty if none.
    fn take_console_output(&self) -> String;

    /// Execute a command under a console-level sender identity.
    fn dispatch_console_command(&self, command: &str);

    /// Send a text message to every connected player.
    fn broadcast_message(&self, message: &str);
}

/// Domain events the host forwards into the relay.
#[derive(Debug, Clone)]
pub enum HostEvent {
    PlayerJoined { name: String },
    PlayerQuit { name: String },
    PlayerChat { name: String, message: String },
    PlayerDeath { name: String },
}
