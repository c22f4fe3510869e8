//! Asynchronous server-side tasks.
//!
//! State-mutating operations that the server cannot complete within the
//! request answer `202 Accepted` with a reference to a task. The task is
//! owned by the resource that spawned it and is only ever read by the
//! client.

use std::fmt;

use abq_api::link::rel;
use abq_api::types::{
    AcceptedRequestDto, JobDto, JobRollbackState, JobState, Resource, TaskDto, TaskState,
};
use serde::Serialize;

use crate::context::AbiquoContext;
use crate::error::{Error, Result};

/// Client-side view of a task's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    /// A job failed and the server is undoing the finished ones.
    Rollback,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn of(task: &TaskDto) -> Self {
        match task.state {
            // An unrecognised state is polled on until it resolves or times out.
            TaskState::Pending | TaskState::Queueing | TaskState::Unknown => Self::Pending,
            TaskState::Started if task.jobs.collection.iter().any(is_rolling_back) => Self::Rollback,
            TaskState::Started => Self::InProgress,
            TaskState::FinishedSuccessfully => Self::Completed,
            TaskState::FinishedUnsuccessfully | TaskState::Aborted | TaskState::AckError => {
                Self::Failed
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Rollback => "rollback",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_rolling_back(job: &JobDto) -> bool {
    matches!(
        job.rollback_state,
        Some(JobRollbackState::Started | JobRollbackState::Pending)
    )
}

/// Reference to the task carrying out an accepted request.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReference {
    accepted: AcceptedRequestDto,
}

impl TaskReference {
    pub fn new(accepted: AcceptedRequestDto) -> Self {
        Self { accepted }
    }

    /// Identifier of the task: last path segment of the `status` link.
    pub fn task_id(&self) -> Result<&str> {
        let link = self.accepted.link(rel::STATUS)?;
        link.last_segment()
            .ok_or_else(|| Error::Protocol(format!("task link without identifier: {}", link.href)))
    }

    pub fn message(&self) -> Option<&str> {
        self.accepted.message.as_deref()
    }

    /// Fetch the referenced task.
    pub async fn resolve(&self, ctx: &AbiquoContext) -> Result<AsyncTask> {
        let task = ctx.api().get_task(&self.accepted).await?;
        Ok(AsyncTask::wrap(ctx, task))
    }
}

/// A server-side task, as last fetched.
#[derive(Debug, Clone)]
pub struct AsyncTask {
    ctx: AbiquoContext,
    target: TaskDto,
}

impl AsyncTask {
    pub fn wrap(ctx: &AbiquoContext, target: TaskDto) -> Self {
        Self {
            ctx: ctx.clone(),
            target,
        }
    }

    /// Resolve an optional task reference, as returned by operations that
    /// may complete synchronously.
    pub(crate) async fn from_accepted(
        ctx: &AbiquoContext,
        accepted: Option<AcceptedRequestDto>,
    ) -> Result<Option<Self>> {
        match accepted {
            Some(accepted) => TaskReference::new(accepted).resolve(ctx).await.map(Some),
            None => Ok(None),
        }
    }

    pub(crate) async fn from_required(
        ctx: &AbiquoContext,
        accepted: AcceptedRequestDto,
    ) -> Result<Self> {
        TaskReference::new(accepted).resolve(ctx).await
    }

    pub fn target(&self) -> &TaskDto {
        &self.target
    }

    pub fn task_id(&self) -> &str {
        &self.target.task_id
    }

    pub fn task_type(&self) -> &str {
        &self.target.task_type
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.target.owner_id.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.target.user_id.as_deref()
    }

    /// Creation time in milliseconds since the epoch.
    pub fn timestamp(&self) -> i64 {
        self.target.timestamp
    }

    pub fn state(&self) -> TaskState {
        self.target.state
    }

    pub fn status(&self) -> TaskStatus {
        TaskStatus::of(&self.target)
    }

    pub fn jobs(&self) -> &[JobDto] {
        &self.target.jobs.collection
    }

    /// Server supplied explanation of a failure: the descriptions of the
    /// failed jobs.
    pub fn failure_detail(&self) -> String {
        let failed: Vec<&str> = self
            .jobs()
            .iter()
            .filter(|job| job.state == JobState::Failed)
            .filter_map(|job| job.description.as_deref())
            .collect();
        if failed.is_empty() {
            format!(
                "task {} ({}) finished unsuccessfully",
                self.task_id(),
                self.task_type()
            )
        } else {
            failed.join("; ")
        }
    }

    /// Fetch the current state of the task.
    pub async fn refresh(&mut self) -> Result<()> {
        self.target = self.ctx.api().refresh_task(&self.target).await?;
        Ok(())
    }
}

/// Order tasks most recent first.
///
/// The sort is stable, but the server gives no order for tasks sharing a
/// timestamp, so such tasks must be treated as an unordered group.
pub fn sort_most_recent_first(tasks: &mut [AsyncTask]) {
    tasks.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
}

#[cfg(test)]
mod tests {
    use abq_api::types::JobsDto;

    use super::*;

    fn task(state: TaskState, jobs: Vec<JobDto>) -> TaskDto {
        TaskDto {
            links: Default::default(),
            task_id: "t1".into(),
            user_id: None,
            task_type: "DEPLOY".into(),
            owner_id: Some("1".into()),
            state,
            timestamp: 0,
            jobs: JobsDto { collection: jobs },
        }
    }

    fn job(state: JobState, rollback: Option<JobRollbackState>, description: &str) -> JobDto {
        JobDto {
            id: "j".into(),
            parent_task_id: "t1".into(),
            job_type: "CONFIGURE".into(),
            description: Some(description.into()),
            state,
            rollback_state: rollback,
            timestamp: 0,
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(TaskStatus::of(&task(TaskState::Queueing, vec![])), TaskStatus::Pending);
        assert_eq!(TaskStatus::of(&task(TaskState::Started, vec![])), TaskStatus::InProgress);
        assert_eq!(
            TaskStatus::of(&task(TaskState::FinishedSuccessfully, vec![])),
            TaskStatus::Completed
        );
        assert_eq!(TaskStatus::of(&task(TaskState::AckError, vec![])), TaskStatus::Failed);
        assert_eq!(TaskStatus::of(&task(TaskState::Aborted, vec![])), TaskStatus::Failed);
        assert_eq!(TaskStatus::of(&task(TaskState::Unknown, vec![])), TaskStatus::Pending);
    }

    #[test]
    fn test_rollback_is_not_terminal() {
        let dto = task(
            TaskState::Started,
            vec![job(JobState::Failed, Some(JobRollbackState::Started), "power on failed")],
        );
        let status = TaskStatus::of(&dto);
        assert_eq!(status, TaskStatus::Rollback);
        assert!(!status.is_terminal());
    }
}
