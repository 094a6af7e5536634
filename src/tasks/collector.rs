//! Telemetry collection task
//!
//! Periodically reads a [`TelemetrySample`] from the host sensors and
//! persists it through the storage backend. Persistence failures drop
//! that iteration's sample and the loop continues.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, instrument, warn};

use super::{TaskCommand, supervisor::TaskHandle};
use crate::config::MetricsTaskConfig;
use crate::sensors::SystemSensors;
use crate::storage::StorageBackend;

pub struct CollectorTask {
    sensors: SystemSensors,
    backend: Arc<dyn StorageBackend>,
    command_rx: mpsc::Receiver<TaskCommand>,
    interval_duration: Duration,
    failures: Arc<AtomicU64>,
}

impl CollectorTask {
    /// Spawn the collector loop and return its handle.
    ///
    /// The caller decides whether the task is enabled; this always spawns.
    pub fn spawn(
        config: &MetricsTaskConfig,
        sensors: SystemSensors,
        backend: Arc<dyn StorageBackend>,
    ) -> TaskHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let failures = Arc::new(AtomicU64::new(0));

        let task = Self {
            sensors,
            backend,
            command_rx: cmd_rx,
            interval_duration: Duration::from_secs(config.interval_seconds),
            failures: failures.clone(),
        };

        let join = tokio::spawn(task.run());

        TaskHandle::new("metrics-collector", cmd_tx, join, failures)
    }

    #[instrument(skip(self), fields(interval = ?self.interval_duration))]
    async fn run(mut self) {
        debug!("starting metrics collector task");

        let mut ticker = interval(self.interval_duration);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_iteration().await;
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        TaskCommand::RunNow { respond_to } => {
                            debug!("received RunNow command");
                            self.run_iteration().await;
                            let _ = respond_to.send(());
                        }
                        TaskCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("metrics collector task stopped");
    }

    /// One unit of work. Errors are counted and logged, never propagated:
    /// a single bad iteration must not terminate the loop.
    async fn run_iteration(&mut self) {
        if let Err(e) = self.collect_and_store().await {
            self.failures.fetch_add(1, Ordering::Relaxed);
            error!("failed to collect and store telemetry: {e:#}");
        }
    }

    async fn collect_and_store(&mut self) -> Result<()> {
        let sample = self.sensors.read();

        if sample.is_empty() {
            warn!("all sensors came back empty, storing the sample anyway");
        }

        let row = self.backend.insert_sample(Utc::now(), &sample).await?;
        debug!("stored sample row {}", row.id);

        Ok(())
    }
}
