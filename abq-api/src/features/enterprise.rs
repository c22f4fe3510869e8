use crate::client::Client;
use crate::error::Result;
use crate::features::EnterpriseOptions;
use crate::link::rel;
use crate::types::*;

impl Client {
    // ===== Enterprises =====

    pub async fn list_enterprises(&self, options: &EnterpriseOptions) -> Result<Vec<EnterpriseDto>> {
        let url = options.apply(self.url("/admin/enterprises")?);
        self.list::<EnterprisesDto>(url).await
    }

    /// Enterprises allowed to use `datacenter`.
    pub async fn list_datacenter_enterprises(
        &self,
        datacenter: &DatacenterDto,
        options: &EnterpriseOptions,
    ) -> Result<Vec<EnterpriseDto>> {
        let url = options.apply(self.resolve(datacenter, rel::ENTERPRISES, &[])?);
        self.list::<EnterprisesDto>(url).await
    }

    pub async fn get_enterprise(&self, id: i32) -> Result<Option<EnterpriseDto>> {
        let url = self.url(&format!("/admin/enterprises/{id}"))?;
        self.get_optional(url).await
    }

    pub async fn create_enterprise(&self, enterprise: &EnterpriseDto) -> Result<EnterpriseDto> {
        let url = self.url("/admin/enterprises")?;
        self.post(url, enterprise).await
    }

    pub async fn list_enterprise_virtual_datacenters(
        &self,
        enterprise: &EnterpriseDto,
    ) -> Result<Vec<VirtualDatacenterDto>> {
        let url = self.resolve(enterprise, rel::CLOUD_VIRTUAL_DATACENTERS, &[])?;
        self.list::<VirtualDatacentersDto>(url).await
    }

    /// Datacenters in which the enterprise has limits.
    pub async fn list_allowed_datacenters(&self, enterprise_id: i32) -> Result<Vec<DatacenterDto>> {
        let mut url = self.url("/admin/datacenters")?;
        url.query_pairs_mut()
            .append_pair("idEnterprise", &enterprise_id.to_string());
        self.list::<DatacentersDto>(url).await
    }

    // ===== Datacenter limits =====

    pub async fn list_limits(&self, enterprise: &EnterpriseDto) -> Result<Vec<DatacenterLimitsDto>> {
        let url = self.resolve(enterprise, rel::LIMITS, &[])?;
        self.list::<DatacentersLimitsDto>(url).await
    }

    /// Limits of the enterprise in `datacenter`, or `None` when the
    /// enterprise is not allowed to use it.
    pub async fn get_limits(
        &self,
        enterprise: &EnterpriseDto,
        datacenter: &DatacenterDto,
    ) -> Result<Option<DatacenterLimitsDto>> {
        let url = self.limits_url(enterprise, datacenter)?;
        let found: Option<DatacentersLimitsDto> = self.get_optional(url).await?;
        Ok(found.and_then(|limits| limits.into_items().into_iter().next()))
    }

    /// Allow the enterprise to use `datacenter` within `limits`.
    pub async fn create_limits(
        &self,
        enterprise: &EnterpriseDto,
        datacenter: &DatacenterDto,
        limits: &DatacenterLimitsDto,
    ) -> Result<DatacenterLimitsDto> {
        let url = self.limits_url(enterprise, datacenter)?;
        self.post(url, limits).await
    }

    fn limits_url(&self, enterprise: &EnterpriseDto, datacenter: &DatacenterDto) -> Result<reqwest::Url> {
        let datacenter_id = datacenter.id_from_link(rel::EDIT)?;
        let mut url = self.resolve(enterprise, rel::LIMITS, &[])?;
        url.query_pairs_mut()
            .append_pair("datacenter", &datacenter_id.to_string());
        Ok(url)
    }
}
