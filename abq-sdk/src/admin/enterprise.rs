use abq_api::link::rel;
use abq_api::types::{DatacenterLimitsDto, EnterpriseDto};
use tracing::info;

use crate::admin::{Limits, ResourceLimits};
use crate::cloud::VirtualDatacenter;
use crate::context::AbiquoContext;
use crate::error::Result;
use crate::infrastructure::Datacenter;
use crate::wrapper::{DomainWrapper, filter, find_first, wrap_all, wrapper};

/// A tenant of the platform, owning virtual datacenters and allowed to use
/// the datacenters in which it has [`Limits`].
#[derive(Debug, Clone)]
pub struct Enterprise {
    inner: DomainWrapper<EnterpriseDto>,
}

wrapper!(Enterprise, EnterpriseDto);

impl Enterprise {
    fn from_inner(inner: DomainWrapper<EnterpriseDto>) -> Self {
        Self { inner }
    }

    pub fn builder(ctx: &AbiquoContext, name: impl Into<String>) -> EnterpriseBuilder {
        EnterpriseBuilder {
            ctx: ctx.clone(),
            name: name.into(),
            limits: ResourceLimits::default(),
            reservation_restricted: false,
        }
    }

    // ===== Domain operations =====

    pub async fn save(&mut self) -> Result<()> {
        self.limits()?.validate()?;
        let created = self.context().api().create_enterprise(self.target()?).await?;
        info!(id = ?created.id, name = ?created.name, "created enterprise");
        self.inner.replace(created);
        Ok(())
    }

    pub async fn update(&mut self) -> Result<()> {
        self.limits()?.validate()?;
        self.inner.update().await
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.inner.delete().await
    }

    // ===== Virtual datacenters =====

    pub async fn list_virtual_datacenters(&self) -> Result<Vec<VirtualDatacenter>> {
        let dtos = self
            .context()
            .api()
            .list_enterprise_virtual_datacenters(self.target()?)
            .await?;
        Ok(wrap_all(self.context(), dtos, VirtualDatacenter::wrap))
    }

    pub async fn list_virtual_datacenters_matching(
        &self,
        predicate: impl Fn(&VirtualDatacenter) -> bool,
    ) -> Result<Vec<VirtualDatacenter>> {
        Ok(filter(self.list_virtual_datacenters().await?, predicate))
    }

    pub async fn find_virtual_datacenter(
        &self,
        predicate: impl Fn(&VirtualDatacenter) -> bool,
    ) -> Result<Option<VirtualDatacenter>> {
        Ok(find_first(self.list_virtual_datacenters().await?, predicate))
    }

    // ===== Datacenters and limits =====

    /// Datacenters the enterprise is allowed to use.
    pub async fn list_allowed_datacenters(&self) -> Result<Vec<Datacenter>> {
        let id = self.inner.id_from_link(rel::EDIT)?;
        let dtos = self.context().api().list_allowed_datacenters(id).await?;
        Ok(wrap_all(self.context(), dtos, Datacenter::wrap))
    }

    pub async fn find_allowed_datacenter(
        &self,
        predicate: impl Fn(&Datacenter) -> bool,
    ) -> Result<Option<Datacenter>> {
        Ok(find_first(self.list_allowed_datacenters().await?, predicate))
    }

    /// Allow the enterprise to use `datacenter` without limits.
    pub async fn allow_datacenter(&self, datacenter: &Datacenter) -> Result<Limits> {
        self.allow_datacenter_within(datacenter, ResourceLimits::default())
            .await
    }

    pub async fn allow_datacenter_within(
        &self,
        datacenter: &Datacenter,
        limits: ResourceLimits,
    ) -> Result<Limits> {
        limits.validate()?;
        let parent = datacenter.inner().require_persisted()?;
        let mut dto = DatacenterLimitsDto::default();
        limits.write_datacenter(&mut dto);
        let created = self
            .context()
            .api()
            .create_limits(self.target()?, parent, &dto)
            .await?;
        info!(enterprise = ?self.id()?, datacenter = ?parent.id, "allowed datacenter");
        Ok(Limits::wrap(self.context(), created))
    }

    /// Remove the limits in `datacenter`. An enterprise that was not
    /// allowed to use it is left as is.
    pub async fn prohibit_datacenter(&self, datacenter: &Datacenter) -> Result<()> {
        match self.limits_in(datacenter).await? {
            Some(mut limits) => limits.delete().await,
            None => Ok(()),
        }
    }

    /// Limits in `datacenter`, or `None` when the enterprise may not use it.
    pub async fn limits_in(&self, datacenter: &Datacenter) -> Result<Option<Limits>> {
        let parent = datacenter.inner().require_persisted()?;
        let found = self.context().api().get_limits(self.target()?, parent).await?;
        Ok(found.map(|dto| Limits::wrap(self.context(), dto)))
    }

    pub async fn list_limits(&self) -> Result<Vec<Limits>> {
        let dtos = self.context().api().list_limits(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, Limits::wrap))
    }

    pub async fn find_limits(&self, predicate: impl Fn(&Limits) -> bool) -> Result<Option<Limits>> {
        Ok(find_first(self.list_limits().await?, predicate))
    }

    // ===== Delegate methods =====

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.target()?.name.as_deref())
    }

    pub fn is_reservation_restricted(&self) -> Result<bool> {
        Ok(self.target()?.is_reservation_restricted)
    }

    /// Enterprise-wide limits, across every datacenter.
    pub fn limits(&self) -> Result<ResourceLimits> {
        Ok(ResourceLimits::of_enterprise(self.target()?))
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.name = Some(name.into());
        Ok(())
    }

    pub fn set_limits(&mut self, limits: ResourceLimits) -> Result<()> {
        limits.write_enterprise(self.inner.target_mut()?);
        Ok(())
    }

    pub fn set_reservation_restricted(&mut self, restricted: bool) -> Result<()> {
        self.inner.target_mut()?.is_reservation_restricted = restricted;
        Ok(())
    }

    pub(crate) fn inner(&self) -> &DomainWrapper<EnterpriseDto> {
        &self.inner
    }
}

#[derive(Debug)]
pub struct EnterpriseBuilder {
    ctx: AbiquoContext,
    name: String,
    limits: ResourceLimits,
    reservation_restricted: bool,
}

impl EnterpriseBuilder {
    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn reservation_restricted(mut self, restricted: bool) -> Self {
        self.reservation_restricted = restricted;
        self
    }

    /// An unsaved enterprise. The limits are checked on save.
    pub fn build(self) -> Enterprise {
        let mut dto = EnterpriseDto {
            name: Some(self.name),
            is_reservation_restricted: self.reservation_restricted,
            ..Default::default()
        };
        self.limits.write_enterprise(&mut dto);
        Enterprise::from_inner(DomainWrapper::new(self.ctx, dto))
    }
}
