use abq_api::EnterpriseOptions;
use abq_api::types::{DatacenterDto, RemoteServiceType};
use tracing::info;

use crate::admin::Enterprise;
use crate::context::AbiquoContext;
use crate::error::Result;
use crate::infrastructure::RemoteService;
use crate::wrapper::{DomainWrapper, filter, find_first, wrap_all, wrapper};

/// A physical datacenter.
#[derive(Debug, Clone)]
pub struct Datacenter {
    inner: DomainWrapper<DatacenterDto>,
}

wrapper!(Datacenter, DatacenterDto);

impl Datacenter {
    fn from_inner(inner: DomainWrapper<DatacenterDto>) -> Self {
        Self { inner }
    }

    pub fn builder(ctx: &AbiquoContext) -> DatacenterBuilder {
        DatacenterBuilder {
            ctx: ctx.clone(),
            name: None,
            location: None,
        }
    }

    pub async fn save(&mut self) -> Result<()> {
        let created = self.context().api().create_datacenter(self.target()?).await?;
        info!(id = ?created.id, name = ?created.name, "created datacenter");
        self.inner.replace(created);
        Ok(())
    }

    pub async fn update(&mut self) -> Result<()> {
        self.inner.update().await
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.inner.delete().await
    }

    // ===== Remote services =====

    pub async fn list_remote_services(&self) -> Result<Vec<RemoteService>> {
        let dtos = self.context().api().list_remote_services(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, RemoteService::wrap))
    }

    pub async fn list_remote_services_matching(
        &self,
        predicate: impl Fn(&RemoteService) -> bool,
    ) -> Result<Vec<RemoteService>> {
        Ok(filter(self.list_remote_services().await?, predicate))
    }

    pub async fn find_remote_service(
        &self,
        predicate: impl Fn(&RemoteService) -> bool,
    ) -> Result<Option<RemoteService>> {
        Ok(find_first(self.list_remote_services().await?, predicate))
    }

    pub async fn get_remote_service(&self, service_type: RemoteServiceType) -> Result<Option<RemoteService>> {
        let found = self
            .context()
            .api()
            .get_remote_service(self.target()?, service_type)
            .await?;
        Ok(found.map(|dto| RemoteService::wrap(self.context(), dto)))
    }

    // ===== Enterprises =====

    /// Enterprises allowed to use this datacenter.
    pub async fn list_enterprises(&self, options: &EnterpriseOptions) -> Result<Vec<Enterprise>> {
        let dtos = self
            .context()
            .api()
            .list_datacenter_enterprises(self.target()?, options)
            .await?;
        Ok(wrap_all(self.context(), dtos, Enterprise::wrap))
    }

    // ===== Delegate methods =====

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.target()?.name.as_deref())
    }

    pub fn location(&self) -> Result<Option<&str>> {
        Ok(self.target()?.location.as_deref())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.name = Some(name.into());
        Ok(())
    }

    pub fn set_location(&mut self, location: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.location = Some(location.into());
        Ok(())
    }

    pub(crate) fn inner(&self) -> &DomainWrapper<DatacenterDto> {
        &self.inner
    }
}

#[derive(Debug)]
pub struct DatacenterBuilder {
    ctx: AbiquoContext,
    name: Option<String>,
    location: Option<String>,
}

impl DatacenterBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn build(self) -> Datacenter {
        let dto = DatacenterDto {
            name: self.name,
            location: self.location,
            ..Default::default()
        };
        Datacenter::from_inner(DomainWrapper::new(self.ctx, dto))
    }
}
