use abq_api::VolumeOptions;
use abq_api::link::rel;
use abq_api::types::{DatacenterDto, EnterpriseDto, VirtualDatacenterDto};
use tracing::info;

use crate::admin::Enterprise;
use crate::cloud::{HardDisk, Tier, VirtualAppliance, Volume};
use crate::error::{Error, Result};
use crate::infrastructure::Datacenter;
use crate::network::{Network, PrivateNetwork};
use crate::wrapper::{DomainWrapper, filter, find_first, wrap_all, wrapper};

/// A virtual datacenter: the quota of a datacenter assigned to an
/// enterprise, holding virtual appliances, networks and storage.
#[derive(Debug, Clone)]
pub struct VirtualDatacenter {
    inner: DomainWrapper<VirtualDatacenterDto>,
    datacenter: Option<DatacenterDto>,
    enterprise: Option<EnterpriseDto>,
}

wrapper!(VirtualDatacenter, VirtualDatacenterDto);

impl VirtualDatacenter {
    fn from_inner(inner: DomainWrapper<VirtualDatacenterDto>) -> Self {
        Self {
            inner,
            datacenter: None,
            enterprise: None,
        }
    }

    /// Start building a virtual datacenter in `datacenter` for
    /// `enterprise`. Both must be persisted.
    pub fn builder(datacenter: &Datacenter, enterprise: &Enterprise) -> Result<VirtualDatacenterBuilder> {
        let parent = datacenter.inner().require_persisted()?.clone();
        let owner = enterprise.inner().require_persisted()?.clone();
        Ok(VirtualDatacenterBuilder {
            ctx: datacenter.context().clone(),
            datacenter: parent,
            enterprise: owner,
            name: None,
            hypervisor_type: None,
        })
    }

    // ===== Domain operations =====

    /// Create the virtual datacenter on the server.
    pub async fn save(&mut self) -> Result<()> {
        let datacenter = self.datacenter.as_ref().ok_or_else(|| {
            Error::validation("virtual datacenter was not built with a parent datacenter")
        })?;
        let enterprise = self
            .enterprise
            .as_ref()
            .ok_or_else(|| Error::validation("virtual datacenter was not built with an enterprise"))?;
        let created = self
            .context()
            .api()
            .create_virtual_datacenter(self.inner.target()?, datacenter, enterprise)
            .await?;
        info!(id = ?created.id, "created virtual datacenter");
        self.inner.replace(created);
        Ok(())
    }

    pub async fn update(&mut self) -> Result<()> {
        self.inner.update().await
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.inner.delete().await
    }

    // ===== Parent access =====

    pub async fn datacenter(&self) -> Result<Option<Datacenter>> {
        let id = self.inner.id_from_link(rel::DATACENTER)?;
        let found = self.context().api().get_datacenter(id).await?;
        Ok(found.map(|dto| Datacenter::wrap(self.context(), dto)))
    }

    pub async fn enterprise(&self) -> Result<Option<Enterprise>> {
        let id = self.inner.id_from_link(rel::ENTERPRISE)?;
        let found = self.context().api().get_enterprise(id).await?;
        Ok(found.map(|dto| Enterprise::wrap(self.context(), dto)))
    }

    // ===== Storage tiers =====

    pub async fn list_tiers(&self) -> Result<Vec<Tier>> {
        let dtos = self.context().api().list_storage_tiers(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, Tier::wrap))
    }

    pub async fn find_tier(&self, predicate: impl Fn(&Tier) -> bool) -> Result<Option<Tier>> {
        Ok(find_first(self.list_tiers().await?, predicate))
    }

    pub async fn get_tier(&self, id: i32) -> Result<Option<Tier>> {
        let found = self.context().api().get_storage_tier(self.target()?, id).await?;
        Ok(found.map(|dto| Tier::wrap(self.context(), dto)))
    }

    // ===== Networks =====

    pub async fn list_private_networks(&self) -> Result<Vec<PrivateNetwork>> {
        let dtos = self.context().api().list_private_networks(self.target()?).await?;
        dtos.into_iter()
            .map(|dto| Network::wrap(self.context(), dto)?.into_private())
            .collect()
    }

    pub async fn list_private_networks_matching(
        &self,
        predicate: impl Fn(&PrivateNetwork) -> bool,
    ) -> Result<Vec<PrivateNetwork>> {
        Ok(filter(self.list_private_networks().await?, predicate))
    }

    pub async fn find_private_network(
        &self,
        predicate: impl Fn(&PrivateNetwork) -> bool,
    ) -> Result<Option<PrivateNetwork>> {
        Ok(find_first(self.list_private_networks().await?, predicate))
    }

    pub async fn get_private_network(&self, id: i32) -> Result<Option<PrivateNetwork>> {
        let found = self.context().api().get_private_network(self.target()?, id).await?;
        found
            .map(|dto| Network::wrap(self.context(), dto)?.into_private())
            .transpose()
    }

    /// The network new virtual machines are attached to by default.
    pub async fn default_network(&self) -> Result<Network> {
        let dto = self.context().api().get_default_network(self.target()?).await?;
        Network::wrap(self.context(), dto)
    }

    pub async fn set_default_network(&self, network: &Network) -> Result<()> {
        self.context()
            .api()
            .set_default_network(self.target()?, network.target()?)
            .await?;
        Ok(())
    }

    // ===== Virtual appliances =====

    pub async fn list_virtual_appliances(&self) -> Result<Vec<VirtualAppliance>> {
        let dtos = self.context().api().list_virtual_appliances(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, VirtualAppliance::wrap))
    }

    pub async fn list_virtual_appliances_matching(
        &self,
        predicate: impl Fn(&VirtualAppliance) -> bool,
    ) -> Result<Vec<VirtualAppliance>> {
        Ok(filter(self.list_virtual_appliances().await?, predicate))
    }

    pub async fn find_virtual_appliance(
        &self,
        predicate: impl Fn(&VirtualAppliance) -> bool,
    ) -> Result<Option<VirtualAppliance>> {
        Ok(find_first(self.list_virtual_appliances().await?, predicate))
    }

    pub async fn get_virtual_appliance(&self, id: i32) -> Result<Option<VirtualAppliance>> {
        let found = self.context().api().get_virtual_appliance(self.target()?, id).await?;
        Ok(found.map(|dto| VirtualAppliance::wrap(self.context(), dto)))
    }

    // ===== Storage =====

    pub async fn list_volumes(&self) -> Result<Vec<Volume>> {
        let dtos = self.context().api().list_volumes(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, Volume::wrap))
    }

    pub async fn list_volumes_matching(&self, predicate: impl Fn(&Volume) -> bool) -> Result<Vec<Volume>> {
        Ok(filter(self.list_volumes().await?, predicate))
    }

    pub async fn find_volume(&self, predicate: impl Fn(&Volume) -> bool) -> Result<Option<Volume>> {
        Ok(find_first(self.list_volumes().await?, predicate))
    }

    /// Volumes matching server-side filters, one page at a time.
    pub async fn search_volumes(&self, options: &VolumeOptions) -> Result<Vec<Volume>> {
        let dtos = self.context().api().search_volumes(self.target()?, options).await?;
        Ok(wrap_all(self.context(), dtos, Volume::wrap))
    }

    pub async fn get_volume(&self, id: i32) -> Result<Option<Volume>> {
        let found = self.context().api().get_volume(self.target()?, id).await?;
        Ok(found.map(|dto| Volume::wrap(self.context(), dto)))
    }

    pub async fn list_hard_disks(&self) -> Result<Vec<HardDisk>> {
        let dtos = self.context().api().list_hard_disks(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, HardDisk::wrap))
    }

    pub async fn find_hard_disk(&self, predicate: impl Fn(&HardDisk) -> bool) -> Result<Option<HardDisk>> {
        Ok(find_first(self.list_hard_disks().await?, predicate))
    }

    pub async fn get_hard_disk(&self, id: i32) -> Result<Option<HardDisk>> {
        let found = self.context().api().get_hard_disk(self.target()?, id).await?;
        Ok(found.map(|dto| HardDisk::wrap(self.context(), dto)))
    }

    // ===== Delegate methods =====

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.target()?.name.as_deref())
    }

    pub fn hypervisor_type(&self) -> Result<Option<&str>> {
        Ok(self.target()?.hypervisor_type.as_deref())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.name = Some(name.into());
        Ok(())
    }

    pub(crate) fn inner(&self) -> &DomainWrapper<VirtualDatacenterDto> {
        &self.inner
    }
}

/// Builder for [`VirtualDatacenter`].
#[derive(Debug)]
pub struct VirtualDatacenterBuilder {
    ctx: crate::context::AbiquoContext,
    datacenter: DatacenterDto,
    enterprise: EnterpriseDto,
    name: Option<String>,
    hypervisor_type: Option<String>,
}

impl VirtualDatacenterBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn hypervisor_type(mut self, hypervisor_type: impl Into<String>) -> Self {
        self.hypervisor_type = Some(hypervisor_type.into());
        self
    }

    /// An unsaved virtual datacenter.
    pub fn build(self) -> VirtualDatacenter {
        let dto = VirtualDatacenterDto {
            name: self.name,
            hypervisor_type: self.hypervisor_type,
            ..Default::default()
        };
        VirtualDatacenter {
            inner: DomainWrapper::new(self.ctx, dto),
            datacenter: Some(self.datacenter),
            enterprise: Some(self.enterprise),
        }
    }
}
