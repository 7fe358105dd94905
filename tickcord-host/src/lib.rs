//! Host-side integration for tickcord
//!
//! The host runs a fixed-rate tick scheduler and must never block on the
//! remote service. Everything here talks to the worker exclusively through
//! the relay bridge queues and the lifecycle signals.

pub mod adapter;
pub mod host;
pub mod plugin;

pub use adapter::SchedulerAdapter;
pub use host::{HostEvent, HostServer, TickScheduler, TickTask};
pub use plugin::RelayPlugin;
