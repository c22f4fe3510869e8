use abq_api::link::rel;
use abq_api::types::{
    VirtualApplianceDto, VirtualApplianceState, VirtualDatacenterDto, VirtualMachineTaskDto,
};
use tracing::info;

use crate::cloud::{VirtualDatacenter, VirtualMachine};
use crate::context::AbiquoContext;
use crate::error::{Error, Result};
use crate::task::AsyncTask;
use crate::wrapper::{DomainWrapper, filter, find_first, wrap_all, wrapper};

/// A group of virtual machines deployed together.
#[derive(Debug, Clone)]
pub struct VirtualAppliance {
    inner: DomainWrapper<VirtualApplianceDto>,
    virtual_datacenter: Option<VirtualDatacenterDto>,
}

wrapper!(VirtualAppliance, VirtualApplianceDto);

impl VirtualAppliance {
    fn from_inner(inner: DomainWrapper<VirtualApplianceDto>) -> Self {
        Self {
            inner,
            virtual_datacenter: None,
        }
    }

    pub fn builder(virtual_datacenter: &VirtualDatacenter) -> Result<VirtualApplianceBuilder> {
        let parent = virtual_datacenter.inner().require_persisted()?.clone();
        Ok(VirtualApplianceBuilder {
            ctx: virtual_datacenter.context().clone(),
            virtual_datacenter: parent,
            name: None,
        })
    }

    // ===== Domain operations =====

    pub async fn save(&mut self) -> Result<()> {
        let vdc = self.virtual_datacenter.as_ref().ok_or_else(|| {
            Error::validation("virtual appliance was not built with a parent virtual datacenter")
        })?;
        let created = self
            .context()
            .api()
            .create_virtual_appliance(vdc, self.inner.target()?)
            .await?;
        info!(id = ?created.id, "created virtual appliance");
        self.inner.replace(created);
        Ok(())
    }

    pub async fn update(&mut self) -> Result<()> {
        self.inner.update().await
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.inner.delete().await
    }

    /// Deploy every virtual machine of the appliance.
    ///
    /// With `force` the enterprise soft limits are ignored.
    pub async fn deploy(&self, force: bool) -> Result<AsyncTask> {
        let options = VirtualMachineTaskDto {
            force_enterprise_soft_limits: force,
            ..Default::default()
        };
        let accepted = self
            .context()
            .api()
            .deploy_virtual_appliance(self.target()?, &options)
            .await?;
        AsyncTask::from_required(self.context(), accepted).await
    }

    /// Undeploy every virtual machine of the appliance.
    ///
    /// With `force` machines are undeployed even when their state would
    /// normally prevent it.
    pub async fn undeploy(&self, force: bool) -> Result<AsyncTask> {
        let options = VirtualMachineTaskDto {
            force_undeploy: force,
            ..Default::default()
        };
        let accepted = self
            .context()
            .api()
            .undeploy_virtual_appliance(self.target()?, &options)
            .await?;
        AsyncTask::from_required(self.context(), accepted).await
    }

    /// Aggregated power state, fetched from the server.
    pub async fn state(&self) -> Result<VirtualApplianceState> {
        let state = self
            .context()
            .api()
            .get_virtual_appliance_state(self.target()?)
            .await?;
        Ok(state.power)
    }

    // ===== Parent access =====

    pub async fn virtual_datacenter(&self) -> Result<Option<VirtualDatacenter>> {
        let id = self.inner.id_from_link(rel::VIRTUAL_DATACENTER)?;
        let found = self.context().api().get_virtual_datacenter(id).await?;
        Ok(found.map(|dto| VirtualDatacenter::wrap(self.context(), dto)))
    }

    // ===== Children access =====

    pub async fn list_virtual_machines(&self) -> Result<Vec<VirtualMachine>> {
        let dtos = self.context().api().list_virtual_machines(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, VirtualMachine::wrap))
    }

    pub async fn list_virtual_machines_matching(
        &self,
        predicate: impl Fn(&VirtualMachine) -> bool,
    ) -> Result<Vec<VirtualMachine>> {
        Ok(filter(self.list_virtual_machines().await?, predicate))
    }

    pub async fn find_virtual_machine(
        &self,
        predicate: impl Fn(&VirtualMachine) -> bool,
    ) -> Result<Option<VirtualMachine>> {
        Ok(find_first(self.list_virtual_machines().await?, predicate))
    }

    pub async fn get_virtual_machine(&self, id: i32) -> Result<Option<VirtualMachine>> {
        let found = self.context().api().get_virtual_machine(self.target()?, id).await?;
        Ok(found.map(|dto| VirtualMachine::wrap(self.context(), dto)))
    }

    // ===== Delegate methods =====

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.target()?.name.as_deref())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.name = Some(name.into());
        Ok(())
    }

    pub(crate) fn inner(&self) -> &DomainWrapper<VirtualApplianceDto> {
        &self.inner
    }
}

#[derive(Debug)]
pub struct VirtualApplianceBuilder {
    ctx: AbiquoContext,
    virtual_datacenter: VirtualDatacenterDto,
    name: Option<String>,
}

impl VirtualApplianceBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> VirtualAppliance {
        let dto = VirtualApplianceDto {
            name: self.name,
            ..Default::default()
        };
        VirtualAppliance {
            inner: DomainWrapper::new(self.ctx, dto),
            virtual_datacenter: Some(self.virtual_datacenter),
        }
    }
}
