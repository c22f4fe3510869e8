use abq_api::link::rel;
use abq_api::types::IpPoolManagementDto;

use crate::error::Result;
use crate::wrapper::{DomainWrapper, wrapper};

/// An address of a network pool.
#[derive(Debug, Clone)]
pub struct Ip {
    inner: DomainWrapper<IpPoolManagementDto>,
}

wrapper!(Ip, IpPoolManagementDto);

impl Ip {
    fn from_inner(inner: DomainWrapper<IpPoolManagementDto>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    /// The address itself, e.g. `10.60.1.4`.
    pub fn ip(&self) -> Result<Option<&str>> {
        Ok(self.target()?.ip.as_deref())
    }

    pub fn mac(&self) -> Result<Option<&str>> {
        Ok(self.target()?.mac.as_deref())
    }

    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.target()?.name.as_deref())
    }

    pub fn network_name(&self) -> Result<Option<&str>> {
        Ok(self.target()?.network_name.as_deref())
    }

    pub fn available(&self) -> Result<bool> {
        Ok(self.target()?.available)
    }

    pub fn quarantine(&self) -> Result<bool> {
        Ok(self.target()?.quarantine)
    }

    /// Relation naming the kind of network the address belongs to, taken
    /// from the title of its `self` link.
    pub fn network_rel(&self) -> Result<&str> {
        let own = self.inner.link(rel::SELF)?;
        Ok(own.title.as_deref().unwrap_or(rel::PRIVATE_NETWORK))
    }
}
