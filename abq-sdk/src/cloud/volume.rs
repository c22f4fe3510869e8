use abq_api::link::rel;
use abq_api::types::{Resource, TierDto, VirtualDatacenterDto, VolumeManagementDto};
use tracing::info;

use crate::cloud::{Tier, VirtualDatacenter};
use crate::context::AbiquoContext;
use crate::error::{Error, Result};
use crate::wrapper::{DomainWrapper, wrapper};

/// State of a volume that is not attached to any virtual machine.
pub const DEFAULT_VOLUME_STATE: &str = "DETACHED";

/// A persistent volume in a storage tier of a virtual datacenter.
#[derive(Debug, Clone)]
pub struct Volume {
    inner: DomainWrapper<VolumeManagementDto>,
    virtual_datacenter: Option<VirtualDatacenterDto>,
    tier: Option<TierDto>,
}

wrapper!(Volume, VolumeManagementDto);

impl Volume {
    fn from_inner(inner: DomainWrapper<VolumeManagementDto>) -> Self {
        Self {
            inner,
            virtual_datacenter: None,
            tier: None,
        }
    }

    pub fn builder(virtual_datacenter: &VirtualDatacenter, tier: &Tier) -> Result<VolumeBuilder> {
        Ok(VolumeBuilder {
            ctx: virtual_datacenter.context().clone(),
            virtual_datacenter: virtual_datacenter.inner().require_persisted()?.clone(),
            tier: tier.inner().require_persisted()?.clone(),
            name: None,
            description: None,
            size_in_mb: None,
        })
    }

    /// Create the volume in the tier it was built with.
    pub async fn save(&mut self) -> Result<()> {
        let (Some(vdc), Some(tier)) = (&self.virtual_datacenter, &self.tier) else {
            return Err(Error::validation(
                "volume was not built with a virtual datacenter and a tier",
            ));
        };
        let tier_href = tier.edit_link()?.href.clone();
        self.inner.target_mut()?.links.upsert(rel::TIER, tier_href);

        let created = self
            .context()
            .api()
            .create_volume(vdc, self.inner.target()?)
            .await?;
        info!(id = ?created.id, name = ?created.name, "created volume");
        self.inner.replace(created);
        Ok(())
    }

    pub async fn update(&mut self) -> Result<()> {
        self.inner.update().await
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.inner.delete().await
    }

    pub async fn virtual_datacenter(&self) -> Result<Option<VirtualDatacenter>> {
        let id = self.inner.id_from_link(rel::VIRTUAL_DATACENTER)?;
        let found = self.context().api().get_virtual_datacenter(id).await?;
        Ok(found.map(|dto| VirtualDatacenter::wrap(self.context(), dto)))
    }

    /// The tier holding the volume, looked up through its virtual
    /// datacenter.
    pub async fn tier(&self) -> Result<Option<Tier>> {
        let tier_id = self.inner.id_from_link(rel::TIER)?;
        let Some(vdc) = self.virtual_datacenter().await? else {
            return Ok(None);
        };
        vdc.get_tier(tier_id).await
    }

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn uuid(&self) -> Result<Option<&str>> {
        Ok(self.target()?.uuid.as_deref())
    }

    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.target()?.name.as_deref())
    }

    pub fn description(&self) -> Result<Option<&str>> {
        Ok(self.target()?.description.as_deref())
    }

    pub fn size_in_mb(&self) -> Result<Option<i64>> {
        Ok(self.target()?.size_in_mb)
    }

    pub fn state(&self) -> Result<Option<&str>> {
        Ok(self.target()?.state.as_deref())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.name = Some(name.into());
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.description = Some(description.into());
        Ok(())
    }

    pub fn set_size_in_mb(&mut self, size_in_mb: i64) -> Result<()> {
        self.inner.target_mut()?.size_in_mb = Some(size_in_mb);
        Ok(())
    }
}

#[derive(Debug)]
pub struct VolumeBuilder {
    ctx: AbiquoContext,
    virtual_datacenter: VirtualDatacenterDto,
    tier: TierDto,
    name: Option<String>,
    description: Option<String>,
    size_in_mb: Option<i64>,
}

impl VolumeBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn size_in_mb(mut self, size_in_mb: i64) -> Self {
        self.size_in_mb = Some(size_in_mb);
        self
    }

    /// An unsaved volume in state [`DEFAULT_VOLUME_STATE`].
    pub fn build(self) -> Volume {
        let dto = VolumeManagementDto {
            name: self.name,
            description: self.description,
            size_in_mb: self.size_in_mb,
            state: Some(DEFAULT_VOLUME_STATE.to_owned()),
            ..Default::default()
        };
        Volume {
            inner: DomainWrapper::new(self.ctx, dto),
            virtual_datacenter: Some(self.virtual_datacenter),
            tier: Some(self.tier),
        }
    }
}
