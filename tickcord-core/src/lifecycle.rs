//! Worker lifecycle state shared between the host and the worker
//!
//! The worker owns the state cell and the readiness flag; the host only
//! reads them. The kill flag is the inverse: set once by the host, observed
//! cooperatively by the worker at its watch-timer granularity.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Lifecycle of the worker's remote session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Created = 0,
    Starting = 1,
    /// Remote service confirmed the session.
    Ready = 2,
    Running = 3,
    ShuttingDown = 4,
    Stopped = 5,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Created,
            1 => WorkerState::Starting,
            2 => WorkerState::Ready,
            3 => WorkerState::Running,
            4 => WorkerState::ShuttingDown,
            _ => WorkerState::Stopped,
        }
    }
}

/// Atomic state cells observed across the host/worker boundary.
pub struct WorkerSignals {
    state: AtomicU8,
    ready: AtomicBool,
    kill: AtomicBool,
}

impl WorkerSignals {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(WorkerState::Created as u8),
            ready: AtomicBool::new(false),
            kill: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Worker-side only.
    pub fn set_state(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// True once the remote session handshake has completed. Never set
    /// again after the worker stops; a worker that failed to start stays
    /// permanently not-ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Worker-side only, set once on the remote READY event.
    pub fn set_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// True while the session is confirmed and the worker has not begun
    /// shutting down. The host capture task gates on this.
    pub fn is_running(&self) -> bool {
        self.is_ready() && matches!(self.state(), WorkerState::Ready | WorkerState::Running)
    }

    /// Host-side only: request cooperative shutdown.
    pub fn request_shutdown(&self) {
        self.kill.store(true, Ordering::Release);
    }

    /// Worker-side: polled by the watch timer.
    pub fn shutdown_requested(&self) -> bool {
        self.kill.load(Ordering::Acquire)
    }
}

impl Default for WorkerSignals {
    fn default() -> Self {
        Self::new()
    }
}
