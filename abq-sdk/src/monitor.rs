use std::time::Duration;

use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::{debug, warn};

use crate::context::AbiquoContext;
use crate::error::{Error, Result};
use crate::task::{AsyncTask, TaskStatus};

/// Polls tasks until they finish.
///
/// The first status request is sent immediately, then one per delay. A
/// request is never started after the deadline: once the next one would fall
/// beyond it, the monitor waits for the deadline and reports a timeout. A
/// status request still in flight at the deadline is abandoned.
#[derive(Debug, Clone, Copy)]
pub struct TaskMonitor {
    delay: Duration,
}

impl TaskMonitor {
    pub fn new(ctx: &AbiquoContext) -> Self {
        Self {
            delay: ctx.config().async_task_monitor_delay,
        }
    }

    /// Use a delay other than the configured one.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for `task` to complete.
    ///
    /// Returns the completed task, [`Error::TaskFailed`] with the server's
    /// detail when it fails, or [`Error::Timeout`] when `timeout` elapses
    /// first. A timeout says nothing about the fate of the task.
    pub async fn await_completion(&self, task: &AsyncTask, timeout: Duration) -> Result<AsyncTask> {
        let deadline = Instant::now() + timeout;
        let mut current = task.clone();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let refreshed = timeout_at(deadline, current.refresh()).await;
            let Ok(refreshed) = refreshed else {
                warn!(
                    task_id = current.task_id(),
                    attempts = attempt,
                    ?timeout,
                    "task status request did not answer in time"
                );
                return Err(Self::timed_out(&current, timeout));
            };
            refreshed?;
            let status = current.status();
            debug!(task_id = current.task_id(), attempt, %status, "polled task");

            match status {
                TaskStatus::Completed => return Ok(current),
                TaskStatus::Failed => {
                    let detail = current.failure_detail();
                    warn!(task_id = current.task_id(), %detail, "task failed");
                    return Err(Error::TaskFailed {
                        task_id: current.task_id().to_owned(),
                        detail,
                    });
                }
                TaskStatus::Pending | TaskStatus::InProgress | TaskStatus::Rollback => {}
            }

            let next = Instant::now() + self.delay;
            if next > deadline {
                sleep_until(deadline).await;
                warn!(
                    task_id = current.task_id(),
                    attempts = attempt,
                    ?timeout,
                    "task did not finish in time"
                );
                return Err(Self::timed_out(&current, timeout));
            }
            sleep_until(next).await;
        }
    }

    fn timed_out(task: &AsyncTask, timeout: Duration) -> Error {
        Error::Timeout {
            operation: format!("task {}", task.task_id()),
            timeout,
        }
    }

    /// Wait for the outcome of an operation that may have completed
    /// synchronously. Without a task there is nothing to poll.
    pub async fn await_outcome(
        &self,
        task: Option<AsyncTask>,
        timeout: Duration,
    ) -> Result<Option<AsyncTask>> {
        match task {
            Some(task) => self.await_completion(&task, timeout).await.map(Some),
            None => Ok(None),
        }
    }

    /// Wait for several tasks in turn, sharing one time budget.
    pub async fn await_all(&self, tasks: &[AsyncTask], timeout: Duration) -> Result<Vec<AsyncTask>> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::with_capacity(tasks.len());
        for task in tasks {
            let remaining = deadline.saturating_duration_since(Instant::now());
            done.push(self.await_completion(task, remaining).await?);
        }
        Ok(done)
    }
}
