//! Worker runtime for tickcord
//!
//! Owns the Discord session: a gateway WebSocket for inbound events and a
//! REST client for outbound sends, pumped on a single-threaded cooperative
//! event loop running on its own OS thread. All traffic to and from the
//! host crosses the relay bridge queues and nothing else.

pub mod gateway;
pub mod rest;
pub mod worker;

pub use rest::{ChannelSink, DiscordRest};
pub use worker::{spawn, ConnectionTarget, RelayWorker, WorkerHandle};
