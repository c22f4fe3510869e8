use abq_api::types::VirtualMachineTemplateDto;

use crate::error::Result;
use crate::wrapper::{DomainWrapper, wrapper};

/// The image a virtual machine is created from. Read only.
#[derive(Debug, Clone)]
pub struct VirtualMachineTemplate {
    inner: DomainWrapper<VirtualMachineTemplateDto>,
}

wrapper!(VirtualMachineTemplate, VirtualMachineTemplateDto);

impl VirtualMachineTemplate {
    fn from_inner(inner: DomainWrapper<VirtualMachineTemplateDto>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.target()?.name.as_deref())
    }

    pub fn description(&self) -> Result<Option<&str>> {
        Ok(self.target()?.description.as_deref())
    }

    pub fn cpu_required(&self) -> Result<Option<i32>> {
        Ok(self.target()?.cpu_required)
    }

    pub fn ram_required(&self) -> Result<Option<i32>> {
        Ok(self.target()?.ram_required)
    }

    /// Disk size required by the template, in bytes.
    pub fn hd_required(&self) -> Result<Option<i64>> {
        Ok(self.target()?.hd_required)
    }

    pub fn disk_format_type(&self) -> Result<Option<&str>> {
        Ok(self.target()?.disk_format_type.as_deref())
    }

    pub(crate) fn inner(&self) -> &DomainWrapper<VirtualMachineTemplateDto> {
        &self.inner
    }
}
