//! Core types for tickcord
//!
//! This crate provides the relay bridge queues, worker lifecycle signals,
//! message sanitizer and configuration shared by the host and worker sides.

pub mod bridge;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod sanitize;

pub use bridge::RelayBridge;
pub use error::{Error, Result};
pub use lifecycle::{WorkerSignals, WorkerState};
