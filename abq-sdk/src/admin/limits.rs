use abq_api::link::rel;
use abq_api::types::{DatacenterLimitsDto, EnterpriseDto};

use crate::error::{Error, Result};
use crate::infrastructure::Datacenter;
use crate::wrapper::{DomainWrapper, wrapper};

/// Soft and hard allocation limits. Zero means unlimited.
///
/// Exceeding a soft limit only raises a warning on the server; exceeding a
/// hard limit rejects the allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceLimits {
    pub ram_soft_mb: i32,
    pub ram_hard_mb: i32,
    pub cpu_soft: i32,
    pub cpu_hard: i32,
    pub hd_soft_mb: i64,
    pub hd_hard_mb: i64,
    pub storage_soft_mb: i64,
    pub storage_hard_mb: i64,
    pub vlans_soft: i64,
    pub vlans_hard: i64,
    pub public_ips_soft: i64,
    pub public_ips_hard: i64,
}

impl ResourceLimits {
    pub fn ram_mb(mut self, soft: i32, hard: i32) -> Self {
        (self.ram_soft_mb, self.ram_hard_mb) = (soft, hard);
        self
    }

    pub fn cpu(mut self, soft: i32, hard: i32) -> Self {
        (self.cpu_soft, self.cpu_hard) = (soft, hard);
        self
    }

    pub fn hd_mb(mut self, soft: i64, hard: i64) -> Self {
        (self.hd_soft_mb, self.hd_hard_mb) = (soft, hard);
        self
    }

    pub fn storage_mb(mut self, soft: i64, hard: i64) -> Self {
        (self.storage_soft_mb, self.storage_hard_mb) = (soft, hard);
        self
    }

    pub fn vlans(mut self, soft: i64, hard: i64) -> Self {
        (self.vlans_soft, self.vlans_hard) = (soft, hard);
        self
    }

    pub fn public_ips(mut self, soft: i64, hard: i64) -> Self {
        (self.public_ips_soft, self.public_ips_hard) = (soft, hard);
        self
    }

    /// A soft limit may not exceed a bounded hard limit.
    pub fn validate(&self) -> Result<()> {
        let pairs = [
            ("ram", i64::from(self.ram_soft_mb), i64::from(self.ram_hard_mb)),
            ("cpu", i64::from(self.cpu_soft), i64::from(self.cpu_hard)),
            ("hd", self.hd_soft_mb, self.hd_hard_mb),
            ("storage", self.storage_soft_mb, self.storage_hard_mb),
            ("vlans", self.vlans_soft, self.vlans_hard),
            ("public ips", self.public_ips_soft, self.public_ips_hard),
        ];
        for (name, soft, hard) in pairs {
            if soft < 0 || hard < 0 {
                return Err(Error::validation(format!("{name} limits must not be negative")));
            }
            if hard != 0 && soft > hard {
                return Err(Error::validation(format!(
                    "{name} soft limit {soft} is above the hard limit {hard}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn of_enterprise(dto: &EnterpriseDto) -> Self {
        Self {
            ram_soft_mb: dto.ram_soft,
            ram_hard_mb: dto.ram_hard,
            cpu_soft: dto.cpu_soft,
            cpu_hard: dto.cpu_hard,
            hd_soft_mb: dto.hd_soft,
            hd_hard_mb: dto.hd_hard,
            storage_soft_mb: dto.storage_soft,
            storage_hard_mb: dto.storage_hard,
            vlans_soft: dto.vlans_soft,
            vlans_hard: dto.vlans_hard,
            public_ips_soft: dto.public_ips_soft,
            public_ips_hard: dto.public_ips_hard,
        }
    }

    pub(crate) fn write_enterprise(&self, dto: &mut EnterpriseDto) {
        dto.ram_soft = self.ram_soft_mb;
        dto.ram_hard = self.ram_hard_mb;
        dto.cpu_soft = self.cpu_soft;
        dto.cpu_hard = self.cpu_hard;
        dto.hd_soft = self.hd_soft_mb;
        dto.hd_hard = self.hd_hard_mb;
        dto.storage_soft = self.storage_soft_mb;
        dto.storage_hard = self.storage_hard_mb;
        dto.vlans_soft = self.vlans_soft;
        dto.vlans_hard = self.vlans_hard;
        dto.public_ips_soft = self.public_ips_soft;
        dto.public_ips_hard = self.public_ips_hard;
    }

    fn of_datacenter(dto: &DatacenterLimitsDto) -> Self {
        Self {
            ram_soft_mb: dto.ram_soft,
            ram_hard_mb: dto.ram_hard,
            cpu_soft: dto.cpu_soft,
            cpu_hard: dto.cpu_hard,
            hd_soft_mb: dto.hd_soft,
            hd_hard_mb: dto.hd_hard,
            storage_soft_mb: dto.storage_soft,
            storage_hard_mb: dto.storage_hard,
            vlans_soft: dto.vlans_soft,
            vlans_hard: dto.vlans_hard,
            public_ips_soft: dto.public_ips_soft,
            public_ips_hard: dto.public_ips_hard,
        }
    }

    pub(crate) fn write_datacenter(&self, dto: &mut DatacenterLimitsDto) {
        dto.ram_soft = self.ram_soft_mb;
        dto.ram_hard = self.ram_hard_mb;
        dto.cpu_soft = self.cpu_soft;
        dto.cpu_hard = self.cpu_hard;
        dto.hd_soft = self.hd_soft_mb;
        dto.hd_hard = self.hd_hard_mb;
        dto.storage_soft = self.storage_soft_mb;
        dto.storage_hard = self.storage_hard_mb;
        dto.vlans_soft = self.vlans_soft;
        dto.vlans_hard = self.vlans_hard;
        dto.public_ips_soft = self.public_ips_soft;
        dto.public_ips_hard = self.public_ips_hard;
    }
}

/// The limits of an enterprise in one datacenter.
#[derive(Debug, Clone)]
pub struct Limits {
    inner: DomainWrapper<DatacenterLimitsDto>,
}

wrapper!(Limits, DatacenterLimitsDto);

impl Limits {
    fn from_inner(inner: DomainWrapper<DatacenterLimitsDto>) -> Self {
        Self { inner }
    }

    pub async fn update(&mut self) -> Result<()> {
        self.limits()?.validate()?;
        self.inner.update().await
    }

    /// Remove the limits, which prohibits the enterprise from using the
    /// datacenter.
    pub async fn delete(&mut self) -> Result<()> {
        self.inner.delete().await
    }

    pub async fn datacenter(&self) -> Result<Option<Datacenter>> {
        let id = self.inner.id_from_link(rel::DATACENTER)?;
        let found = self.context().api().get_datacenter(id).await?;
        Ok(found.map(|dto| Datacenter::wrap(self.context(), dto)))
    }

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn limits(&self) -> Result<ResourceLimits> {
        Ok(ResourceLimits::of_datacenter(self.target()?))
    }

    pub fn set_limits(&mut self, limits: ResourceLimits) -> Result<()> {
        limits.write_datacenter(self.inner.target_mut()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_hard_limit_accepts_any_soft_limit() {
        assert!(ResourceLimits::default().ram_mb(4096, 0).validate().is_ok());
        assert!(ResourceLimits::default().cpu(4, 4).validate().is_ok());
    }

    #[test]
    fn test_soft_limit_above_hard_limit_is_rejected() {
        let err = ResourceLimits::default().vlans(5, 2).validate().unwrap_err();
        assert!(err.to_string().contains("vlans soft limit 5"));

        assert!(ResourceLimits::default().storage_mb(-1, 0).validate().is_err());
    }

    #[test]
    fn test_limits_are_written_to_transfer_object() {
        let limits = ResourceLimits::default()
            .ram_mb(1024, 2048)
            .public_ips(1, 3);
        let mut dto = DatacenterLimitsDto::default();
        limits.write_datacenter(&mut dto);

        assert_eq!((dto.ram_soft, dto.ram_hard), (1024, 2048));
        assert_eq!(ResourceLimits::of_datacenter(&dto), limits);
    }
}
