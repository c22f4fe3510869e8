use abq_api::types::TierDto;

use crate::error::Result;
use crate::wrapper::{DomainWrapper, wrapper};

/// A storage tier of a virtual datacenter. Read only.
#[derive(Debug, Clone)]
pub struct Tier {
    inner: DomainWrapper<TierDto>,
}

wrapper!(Tier, TierDto);

impl Tier {
    fn from_inner(inner: DomainWrapper<TierDto>) -> Self {
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

    pub fn enabled(&self) -> Result<bool> {
        Ok(self.target()?.enabled.unwrap_or(false))
    }

    pub(crate) fn inner(&self) -> &DomainWrapper<TierDto> {
        &self.inner
    }
}
