//! Relay bridge between the host tick loop and the worker event loop
//!
//! The bridge is a set of four unbounded FIFO queues, the sole shared
//! surface between the two execution contexts. Host-side code writes the
//! outbound queues and reads the inbound ones; the worker does the reverse.

pub mod queue;

pub use queue::RelayQueue;

use std::sync::Arc;

/// The four relay queues.
///
/// Direction names are host-relative: outbound queues carry text toward the
/// remote service, inbound queues carry text toward the host.
pub struct RelayBridge {
    /// Captured console output, host -> remote console channel
    pub console_outbound: RelayQueue,
    /// Chat lines and notices, host -> remote chat channel
    pub chat_outbound: RelayQueue,
    /// Remote console-channel messages, remote -> host command dispatch
    pub console_inbound: RelayQueue,
    /// Remote chat-channel messages, remote -> host broadcast
    pub chat_inbound: RelayQueue,
}

impl RelayBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            console_outbound: RelayQueue::new(),
            chat_outbound: RelayQueue::new(),
            console_inbound: RelayQueue::new(),
            chat_inbound: RelayQueue::new(),
        })
    }

    /// Total number of messages still waiting to go out to the remote
    /// service. The host shutdown path polls this until it reaches zero.
    pub fn outbound_depth(&self) -> usize {
        self.console_outbound.depth() + self.chat_outbound.depth()
    }
}
