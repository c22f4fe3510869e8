use crate::client::Client;
use crate::error::Result;
use crate::link::rel;
use crate::types::{AcceptedRequestDto, Resource, TaskDto, TasksDto};

impl Client {
    /// Tasks spawned by operations on `owner`, in server order.
    pub async fn list_tasks<R: Resource>(&self, owner: &R) -> Result<Vec<TaskDto>> {
        let url = self.resolve(owner, rel::TASKS, &[])?;
        self.list::<TasksDto>(url).await
    }

    /// The task behind a `202 Accepted` response.
    pub async fn get_task(&self, accepted: &AcceptedRequestDto) -> Result<TaskDto> {
        let url = self.resolve(accepted, rel::STATUS, &[])?;
        self.get(url).await
    }

    /// Current representation of a task, fetched through its `self` link.
    pub async fn refresh_task(&self, task: &TaskDto) -> Result<TaskDto> {
        let url = self.resolve(task, rel::SELF, &[])?;
        self.get(url).await
    }
}
