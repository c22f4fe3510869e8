use serde::{Deserialize, Serialize};

use super::{collection, resource};
use crate::link::LinkSet;

/// Server-side state of an asynchronous task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Pending,
    Queueing,
    Started,
    FinishedSuccessfully,
    FinishedUnsuccessfully,
    Aborted,
    AckError,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Pending,
    Started,
    Done,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobRollbackState {
    Unknown,
    Pending,
    Started,
    Done,
    Failed,
}

/// One step of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "job")]
pub struct JobDto {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "parentTaskId", default)]
    pub parent_task_id: String,
    #[serde(rename = "type", default)]
    pub job_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub state: JobState,
    #[serde(rename = "rollbackState", default, skip_serializing_if = "Option::is_none")]
    pub rollback_state: Option<JobRollbackState>,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "jobs")]
pub struct JobsDto {
    #[serde(rename = "job", default)]
    pub collection: Vec<JobDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "task")]
pub struct TaskDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "type", default)]
    pub task_type: String,
    #[serde(rename = "ownerId", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub state: TaskState,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub jobs: JobsDto,
}

resource!(TaskDto, "Task");
collection!(TasksDto, "tasks", "task", TaskDto);

/// Body of a `202 Accepted` response: a reference to the task that will
/// carry out the request, reachable through the `status` link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "acceptedrequest")]
pub struct AcceptedRequestDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

resource!(AcceptedRequestDto, "AcceptedRequest");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_states_deserialize() {
        let task: TaskDto = quick_xml::de::from_str(
            "<task><taskId>t1</taskId><type>DEPLOY</type><state>HIBERNATING</state>\
             <timestamp>0</timestamp><jobs><job><id>j1</id><state>WAITING</state>\
             </job></jobs></task>",
        )
        .unwrap();

        assert_eq!(task.state, TaskState::Unknown);
        assert_eq!(task.jobs.collection[0].state, JobState::Unknown);
    }

    #[test]
    fn test_known_state_is_kept() {
        let task: TaskDto = quick_xml::de::from_str(
            "<task><taskId>t1</taskId><state>FINISHED_SUCCESSFULLY</state></task>",
        )
        .unwrap();
        assert_eq!(task.state, TaskState::FinishedSuccessfully);
    }
}
