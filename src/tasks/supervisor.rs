//! Task supervision and bounded shutdown
//!
//! The supervisor owns one [`TaskHandle`] per enabled background task.
//! Shutdown is cooperative: each task is sent a cancel command, then the
//! supervisor waits up to a grace timeout for the task to acknowledge by
//! exiting. A task that ignores cancellation is logged and abandoned;
//! shutdown never hangs on one stuck task.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Context;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use super::TaskCommand;

/// Handle to one running periodic task.
///
/// Created when the task is spawned, consumed when the supervisor joins
/// it during shutdown. Tasks are never respawned within a process.
pub struct TaskHandle {
    name: String,
    cmd_tx: mpsc::Sender<TaskCommand>,
    join: JoinHandle<()>,
    failures: Arc<AtomicU64>,
}

impl TaskHandle {
    pub fn new(
        name: impl Into<String>,
        cmd_tx: mpsc::Sender<TaskCommand>,
        join: JoinHandle<()>,
        failures: Arc<AtomicU64>,
    ) -> Self {
        Self {
            name: name.into(),
            cmd_tx,
            join,
            failures,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterations that failed (or were skipped) since the task started.
    ///
    /// This is the observable error channel: loops swallow per-iteration
    /// errors by design, so tests and operators count them here instead
    /// of scraping logs.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// True once the task's loop has exited (normally or by panic).
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Trigger one immediate iteration and wait for it to finish.
    pub async fn run_now(&self) -> anyhow::Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(TaskCommand::RunNow { respond_to: tx })
            .await
            .context("failed to send RunNow command")?;
        rx.await.context("task dropped RunNow acknowledgement")?;
        Ok(())
    }

    /// Request cooperative cancellation.
    ///
    /// Delivery is best-effort: a task that already exited has dropped
    /// its receiver, which is fine.
    pub async fn cancel(&self) {
        let _ = self.cmd_tx.send(TaskCommand::Shutdown).await;
    }
}

/// Tracks running tasks and shuts them down in bounded time.
pub struct Supervisor {
    handles: Vec<TaskHandle>,
    grace: Duration,
}

impl Supervisor {
    pub fn new(grace: Duration) -> Self {
        Self {
            handles: Vec::new(),
            grace,
        }
    }

    pub fn register(&mut self, handle: TaskHandle) {
        debug!("supervising task '{}'", handle.name());
        self.handles.push(handle);
    }

    pub fn task_count(&self) -> usize {
        self.handles.len()
    }

    pub fn handles(&self) -> &[TaskHandle] {
        &self.handles
    }

    /// Cancel every task and wait up to the grace timeout for each.
    ///
    /// Outcomes per task: acknowledged stop, already finished with a
    /// panic (logged, not re-raised), or grace timeout (logged, the task
    /// is abandoned and the supervisor moves on).
    pub async fn shutdown(self) {
        info!(
            "shutting down {} background task(s) (grace: {:?})",
            self.handles.len(),
            self.grace
        );

        // Cancel every task up front: a stuck task burning its grace
        // window must not delay delivery to the tasks behind it.
        for handle in &self.handles {
            handle.cancel().await;
        }

        for handle in self.handles {
            let TaskHandle {
                name,
                cmd_tx: _,
                join,
                failures,
            } = handle;

            match time::timeout(self.grace, join).await {
                Ok(Ok(())) => {
                    debug!(
                        "task '{name}' stopped ({} iteration failure(s) over its lifetime)",
                        failures.load(Ordering::Relaxed)
                    );
                }
                Ok(Err(e)) if e.is_panic() => {
                    warn!("task '{name}' had finished with exception: {e}");
                }
                Ok(Err(e)) => {
                    warn!("task '{name}' join failed: {e}");
                }
                Err(_) => {
                    warn!(
                        "task '{name}' did not stop within {:?}, abandoning it",
                        self.grace
                    );
                }
            }
        }

        info!("background tasks shut down");
    }
}
