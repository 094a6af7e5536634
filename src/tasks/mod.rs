//! Background task lifecycle
//!
//! The daemon runs exactly two periodic loops: telemetry collection and
//! fan control. Each is an actor owning its own state, driven by a
//! `tokio::select!` over an interval tick and a command channel. A bad
//! iteration is logged and counted, never fatal; the loop runs until a
//! [`TaskCommand::Shutdown`] arrives.
//!
//! ```text
//! Supervisor ──spawns──▶ CollectorTask ──▶ SystemSensors ──▶ StorageBackend
//!      │
//!      └─────spawns──▶ FanControlTask ──▶ SystemSensors ──▶ FanController
//! ```
//!
//! On process shutdown the [`supervisor::Supervisor`] cancels every handle
//! and waits a bounded grace period per task.

pub mod collector;
pub mod fan_control;
pub mod supervisor;

pub use collector::CollectorTask;
pub use fan_control::FanControlTask;
pub use supervisor::{Supervisor, TaskHandle};

use tokio::sync::oneshot;

/// Commands accepted by every periodic task
#[derive(Debug)]
pub enum TaskCommand {
    /// Run one iteration immediately, bypassing the interval timer.
    ///
    /// Used for testing and manual refresh operations.
    RunNow {
        /// Acknowledged once the iteration has finished
        respond_to: oneshot::Sender<()>,
    },

    /// Cooperatively stop the loop.
    ///
    /// The task finishes any in-flight iteration and then exits.
    Shutdown,
}
