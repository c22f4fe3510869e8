//! Entry points to the resource trees, scoped to a context.

use abq_api::{EnterpriseOptions, IpOptions, VirtualDatacenterOptions, VolumeOptions};

use crate::admin::Enterprise;
use crate::cloud::{VirtualAppliance, VirtualDatacenter, VirtualMachine, Volume};
use crate::context::AbiquoContext;
use crate::error::Result;
use crate::fanout::FanOut;
use crate::infrastructure::Datacenter;
use crate::network::{Ip, PrivateNetwork};
use crate::wrapper::{filter, find_first, wrap_all};

/// Virtual datacenters and everything below them.
#[derive(Debug, Clone)]
pub struct CloudService {
    ctx: AbiquoContext,
}

impl CloudService {
    pub(crate) fn new(ctx: AbiquoContext) -> Self {
        Self { ctx }
    }

    pub async fn list_virtual_datacenters(
        &self,
        options: VirtualDatacenterOptions,
    ) -> Result<Vec<VirtualDatacenter>> {
        let dtos = self.ctx.api().list_virtual_datacenters(options).await?;
        Ok(wrap_all(&self.ctx, dtos, VirtualDatacenter::wrap))
    }

    pub async fn list_virtual_datacenters_matching(
        &self,
        predicate: impl Fn(&VirtualDatacenter) -> bool,
    ) -> Result<Vec<VirtualDatacenter>> {
        let all = self.list_virtual_datacenters(VirtualDatacenterOptions::default()).await?;
        Ok(filter(all, predicate))
    }

    pub async fn find_virtual_datacenter(
        &self,
        predicate: impl Fn(&VirtualDatacenter) -> bool,
    ) -> Result<Option<VirtualDatacenter>> {
        let all = self.list_virtual_datacenters(VirtualDatacenterOptions::default()).await?;
        Ok(find_first(all, predicate))
    }

    pub async fn get_virtual_datacenter(&self, id: i32) -> Result<Option<VirtualDatacenter>> {
        let found = self.ctx.api().get_virtual_datacenter(id).await?;
        Ok(found.map(|dto| VirtualDatacenter::wrap(&self.ctx, dto)))
    }

    /// Every virtual appliance of every virtual datacenter, using the
    /// context's fan-out settings.
    pub async fn list_virtual_appliances(&self) -> Result<Vec<VirtualAppliance>> {
        self.list_virtual_appliances_with(self.ctx.fan_out()).await
    }

    pub async fn list_virtual_appliances_with(&self, fan_out: FanOut) -> Result<Vec<VirtualAppliance>> {
        fan_out
            .within("list virtual appliances", self.virtual_appliances(fan_out))
            .await
    }

    /// Every virtual machine of every virtual appliance, using the
    /// context's fan-out settings.
    pub async fn list_virtual_machines(&self) -> Result<Vec<VirtualMachine>> {
        self.list_virtual_machines_with(self.ctx.fan_out()).await
    }

    pub async fn list_virtual_machines_with(&self, fan_out: FanOut) -> Result<Vec<VirtualMachine>> {
        fan_out
            .within("list virtual machines", async {
                let vapps = self.virtual_appliances(fan_out).await?;
                fan_out
                    .flat_map(vapps, |vapp| async move { vapp.list_virtual_machines().await })
                    .await
            })
            .await
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

    async fn virtual_appliances(&self, fan_out: FanOut) -> Result<Vec<VirtualAppliance>> {
        let vdcs = self
            .list_virtual_datacenters(VirtualDatacenterOptions::default())
            .await?;
        fan_out
            .flat_map(vdcs, |vdc| async move { vdc.list_virtual_appliances().await })
            .await
    }
}

/// Datacenters and their remote services.
#[derive(Debug, Clone)]
pub struct InfrastructureService {
    ctx: AbiquoContext,
}

impl InfrastructureService {
    pub(crate) fn new(ctx: AbiquoContext) -> Self {
        Self { ctx }
    }

    pub async fn list_datacenters(&self) -> Result<Vec<Datacenter>> {
        let dtos = self.ctx.api().list_datacenters().await?;
        Ok(wrap_all(&self.ctx, dtos, Datacenter::wrap))
    }

    pub async fn list_datacenters_matching(
        &self,
        predicate: impl Fn(&Datacenter) -> bool,
    ) -> Result<Vec<Datacenter>> {
        Ok(filter(self.list_datacenters().await?, predicate))
    }

    pub async fn find_datacenter(&self, predicate: impl Fn(&Datacenter) -> bool) -> Result<Option<Datacenter>> {
        Ok(find_first(self.list_datacenters().await?, predicate))
    }

    pub async fn get_datacenter(&self, id: i32) -> Result<Option<Datacenter>> {
        let found = self.ctx.api().get_datacenter(id).await?;
        Ok(found.map(|dto| Datacenter::wrap(&self.ctx, dto)))
    }
}

/// Enterprises.
#[derive(Debug, Clone)]
pub struct AdministrationService {
    ctx: AbiquoContext,
}

impl AdministrationService {
    pub(crate) fn new(ctx: AbiquoContext) -> Self {
        Self { ctx }
    }

    pub async fn list_enterprises(&self) -> Result<Vec<Enterprise>> {
        let dtos = self.ctx.api().list_enterprises(&EnterpriseOptions::default()).await?;
        Ok(wrap_all(&self.ctx, dtos, Enterprise::wrap))
    }

    pub async fn list_enterprises_matching(
        &self,
        predicate: impl Fn(&Enterprise) -> bool,
    ) -> Result<Vec<Enterprise>> {
        Ok(filter(self.list_enterprises().await?, predicate))
    }

    pub async fn find_enterprise(&self, predicate: impl Fn(&Enterprise) -> bool) -> Result<Option<Enterprise>> {
        Ok(find_first(self.list_enterprises().await?, predicate))
    }

    pub async fn get_enterprise(&self, id: i32) -> Result<Option<Enterprise>> {
        let found = self.ctx.api().get_enterprise(id).await?;
        Ok(found.map(|dto| Enterprise::wrap(&self.ctx, dto)))
    }
}

/// Listings filtered and paged by the server instead of the client.
#[derive(Debug, Clone)]
pub struct SearchService {
    ctx: AbiquoContext,
}

impl SearchService {
    pub(crate) fn new(ctx: AbiquoContext) -> Self {
        Self { ctx }
    }

    pub async fn search_enterprises(&self, options: &EnterpriseOptions) -> Result<Vec<Enterprise>> {
        let dtos = self.ctx.api().list_enterprises(options).await?;
        Ok(wrap_all(&self.ctx, dtos, Enterprise::wrap))
    }

    pub async fn search_volumes(
        &self,
        virtual_datacenter: &VirtualDatacenter,
        options: &VolumeOptions,
    ) -> Result<Vec<Volume>> {
        virtual_datacenter.search_volumes(options).await
    }

    /// Addresses of the pool of a private network.
    pub async fn search_private_ips(&self, network: &PrivateNetwork, options: &IpOptions) -> Result<Vec<Ip>> {
        network.search_ips(options).await
    }
}
