//! Plugin wiring
//!
//! Enable: load config, init logging, spawn the worker, register the
//! scheduler tasks and announce startup. Disable: announce shutdown, block
//! until the outbound queues drain, then stop and join the worker.

use crate::adapter::SchedulerAdapter;
use crate::host::{HostEvent, HostServer, TickScheduler};
use std::sync::Arc;
use tickcord_core::config::{Config, ConfigLoader};
use tickcord_core::logging::init_logging;
use tickcord_core::{RelayBridge, Result};
use tickcord_worker::WorkerHandle;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// The assembled relay: one worker, one adapter, one bridge.
pub struct RelayPlugin {
    adapter: Arc<SchedulerAdapter>,
    worker: Option<WorkerHandle>,
    _log_guard: WorkerGuard,
}

impl RelayPlugin {
    /// Enable with configuration from the default config directory.
    ///
    /// On first enable this writes a default `config.json` template, then
    /// fails validation so the admin has something to fill in.
    pub fn enable(host: Arc<dyn HostServer>, scheduler: &dyn TickScheduler) -> Result<Self> {
        let loader = ConfigLoader::new();
        loader.write_default_if_missing()?;
        let config = loader.load()?;
        Self::enable_with_config(config, host, scheduler)
    }

    /// Enable with an already-loaded configuration.
    pub fn enable_with_config(
        config: Config,
        host: Arc<dyn HostServer>,
        scheduler: &dyn TickScheduler,
    ) -> Result<Self> {
        let log_guard = init_logging(&config.logging);

        let bridge = RelayBridge::new();
        let worker = tickcord_worker::spawn(config.discord.into(), Arc::clone(&bridge))?;

        let adapter = Arc::new(SchedulerAdapter::new(
            bridge,
            worker.signals(),
            host,
            config.host,
        ));
        adapter.register(scheduler);
        adapter.notify_started();

        info!("Relay enabled");
        Ok(Self {
            adapter,
            worker: Some(worker),
            _log_guard: log_guard,
        })
    }

    pub fn adapter(&self) -> &Arc<SchedulerAdapter> {
        &self.adapter
    }

    pub fn worker(&self) -> Option<&WorkerHandle> {
        self.worker.as_ref()
    }

    /// Forward a host domain event to the relay.
    pub fn handle_event(&self, event: HostEvent) {
        self.adapter.handle_event(event);
    }

    /// Disable the relay as part of host shutdown.
    ///
    /// Blocks until the outbound queues drain (see
    /// [`SchedulerAdapter::begin_shutdown`]), then requests worker shutdown
    /// and joins its thread.
    pub fn disable(mut self) {
        self.adapter.begin_shutdown();
        if let Some(worker) = self.worker.take() {
            worker.join();
        }
        info!("Relay disabled");
    }
}
