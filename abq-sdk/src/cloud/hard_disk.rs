use abq_api::link::rel;
use abq_api::types::{DiskManagementDto, VirtualDatacenterDto};
use tracing::info;

use crate::cloud::VirtualDatacenter;
use crate::context::AbiquoContext;
use crate::error::{Error, Result};
use crate::wrapper::{DomainWrapper, wrapper};

/// A hard disk of a virtual datacenter. Disks cannot be modified once
/// created.
#[derive(Debug, Clone)]
pub struct HardDisk {
    inner: DomainWrapper<DiskManagementDto>,
    virtual_datacenter: Option<VirtualDatacenterDto>,
}

wrapper!(HardDisk, DiskManagementDto);

impl HardDisk {
    fn from_inner(inner: DomainWrapper<DiskManagementDto>) -> Self {
        Self {
            inner,
            virtual_datacenter: None,
        }
    }

    pub fn builder(virtual_datacenter: &VirtualDatacenter) -> Result<HardDiskBuilder> {
        Ok(HardDiskBuilder {
            ctx: virtual_datacenter.context().clone(),
            virtual_datacenter: virtual_datacenter.inner().require_persisted()?.clone(),
            size_in_mb: None,
        })
    }

    pub async fn save(&mut self) -> Result<()> {
        let vdc = self.virtual_datacenter.as_ref().ok_or_else(|| {
            Error::validation("hard disk was not built with a parent virtual datacenter")
        })?;
        let created = self
            .context()
            .api()
            .create_hard_disk(vdc, self.inner.target()?)
            .await?;
        info!(id = ?created.id, size_in_mb = ?created.size_in_mb, "created hard disk");
        self.inner.replace(created);
        Ok(())
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.inner.delete().await
    }

    pub async fn virtual_datacenter(&self) -> Result<Option<VirtualDatacenter>> {
        let id = self.inner.id_from_link(rel::VIRTUAL_DATACENTER)?;
        let found = self.context().api().get_virtual_datacenter(id).await?;
        Ok(found.map(|dto| VirtualDatacenter::wrap(self.context(), dto)))
    }

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn size_in_mb(&self) -> Result<Option<i64>> {
        Ok(self.target()?.size_in_mb)
    }

    /// Position of the disk in the virtual machine it is attached to.
    pub fn sequence(&self) -> Result<Option<i32>> {
        Ok(self.target()?.sequence)
    }
}

#[derive(Debug)]
pub struct HardDiskBuilder {
    ctx: AbiquoContext,
    virtual_datacenter: VirtualDatacenterDto,
    size_in_mb: Option<i64>,
}

impl HardDiskBuilder {
    pub fn size_in_mb(mut self, size_in_mb: i64) -> Self {
        self.size_in_mb = Some(size_in_mb);
        self
    }

    pub fn build(self) -> HardDisk {
        let dto = DiskManagementDto {
            size_in_mb: self.size_in_mb,
            ..Default::default()
        };
        HardDisk {
            inner: DomainWrapper::new(self.ctx, dto),
            virtual_datacenter: Some(self.virtual_datacenter),
        }
    }
}
