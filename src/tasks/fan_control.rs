//! Fan control task
//!
//! Periodically reads the CPU temperature and lets the [`FanController`]
//! decide whether the actuator needs a new level. An iteration without a
//! temperature reading skips the adjustment and is counted as a failure
//! so the gap is observable.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, info, instrument, warn};

use super::{TaskCommand, supervisor::TaskHandle};
use crate::config::FanControlConfig;
use crate::control::{FanController, SysfsWriter};
use crate::control::sysfs::ActuatorWriter;
use crate::sensors::SystemSensors;

pub struct FanControlTask<W: ActuatorWriter> {
    sensors: SystemSensors,
    controller: FanController<W>,
    command_rx: mpsc::Receiver<TaskCommand>,
    interval_duration: Duration,
    failures: Arc<AtomicU64>,
}

impl FanControlTask<SysfsWriter> {
    /// Spawn the fan control loop against the real sysfs writer.
    ///
    /// The caller has already checked that control is enabled and both
    /// hardware paths are configured.
    pub fn spawn(config: &FanControlConfig, sensors: SystemSensors) -> TaskHandle {
        let controller = FanController::new(
            config.curve.clone(),
            config.control_path.clone(),
            config.enable_path.clone(),
            SysfsWriter,
        );

        Self::spawn_with_controller(config, sensors, controller)
    }
}

impl<W: ActuatorWriter + 'static> FanControlTask<W> {
    /// Spawn with an injected controller (tests use a mock writer).
    pub fn spawn_with_controller(
        config: &FanControlConfig,
        sensors: SystemSensors,
        controller: FanController<W>,
    ) -> TaskHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let failures = Arc::new(AtomicU64::new(0));

        let task = Self {
            sensors,
            controller,
            command_rx: cmd_rx,
            interval_duration: Duration::from_secs(config.interval_seconds),
            failures: failures.clone(),
        };

        let join = tokio::spawn(task.run());

        TaskHandle::new("fan-control", cmd_tx, join, failures)
    }

    #[instrument(skip(self), fields(interval = ?self.interval_duration))]
    async fn run(mut self) {
        info!("starting fan control task");

        // Hardware may boot in automatic mode; assert manual control once
        // up front. Failures are logged by the writer and retried on the
        // first level change anyway.
        self.controller.assert_manual_mode();

        let mut ticker = interval(self.interval_duration);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_iteration();
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        TaskCommand::RunNow { respond_to } => {
                            debug!("received RunNow command");
                            self.run_iteration();
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

        debug!("fan control task stopped");
    }

    /// One unit of work. Never propagates: a missing reading is counted
    /// and skipped, and the controller itself treats write failures as
    /// state, not errors.
    fn run_iteration(&mut self) {
        match self.sensors.read_cpu_temperature() {
            Some(temperature) => self.controller.adjust(temperature),
            None => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!("no cpu temperature reading, skipping fan adjustment");
            }
        }
    }
}
