use reqwest::Method;

use crate::binders;
use crate::client::Client;
use crate::error::Result;
use crate::features::{IpOptions, VolumeOptions};
use crate::link::rel;
use crate::types::*;

/// Filters of the virtual datacenter listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualDatacenterOptions {
    pub datacenter: Option<i32>,
    pub enterprise: Option<i32>,
}

impl VirtualDatacenterOptions {
    pub fn datacenter(mut self, id: i32) -> Self {
        self.datacenter = Some(id);
        self
    }

    pub fn enterprise(mut self, id: i32) -> Self {
        self.enterprise = Some(id);
        self
    }

    fn query(&self) -> String {
        let params: Vec<String> = [("datacenter", self.datacenter), ("enterprise", self.enterprise)]
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
            .collect();
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

impl Client {
    // ===== Virtual datacenters =====

    pub async fn list_virtual_datacenters(
        &self,
        options: VirtualDatacenterOptions,
    ) -> Result<Vec<VirtualDatacenterDto>> {
        let url = self.url(&format!("/cloud/virtualdatacenters{}", options.query()))?;
        self.list::<VirtualDatacentersDto>(url).await
    }

    pub async fn get_virtual_datacenter(&self, id: i32) -> Result<Option<VirtualDatacenterDto>> {
        let url = self.url(&format!("/cloud/virtualdatacenters/{id}"))?;
        self.get_optional(url).await
    }

    /// Create a virtual datacenter in `datacenter` for `enterprise`.
    pub async fn create_virtual_datacenter(
        &self,
        virtual_datacenter: &VirtualDatacenterDto,
        datacenter: &DatacenterDto,
        enterprise: &EnterpriseDto,
    ) -> Result<VirtualDatacenterDto> {
        let datacenter_id = datacenter.id_from_link(rel::EDIT)?;
        let enterprise_id = enterprise.id_from_link(rel::EDIT)?;
        let options = VirtualDatacenterOptions::default()
            .datacenter(datacenter_id)
            .enterprise(enterprise_id);
        let url = self.url(&format!("/cloud/virtualdatacenters{}", options.query()))?;
        self.post(url, virtual_datacenter).await
    }

    pub async fn list_storage_tiers(&self, vdc: &VirtualDatacenterDto) -> Result<Vec<TierDto>> {
        let url = self.resolve(vdc, rel::TIERS, &[])?;
        self.list::<TiersDto>(url).await
    }

    pub async fn get_storage_tier(
        &self,
        vdc: &VirtualDatacenterDto,
        tier_id: i32,
    ) -> Result<Option<TierDto>> {
        let url = self.resolve(vdc, rel::TIERS, &[&tier_id.to_string()])?;
        self.get_optional(url).await
    }

    // ===== Networks =====

    pub async fn list_private_networks(
        &self,
        vdc: &VirtualDatacenterDto,
    ) -> Result<Vec<VlanNetworkDto>> {
        let url = self.resolve(vdc, rel::PRIVATE_NETWORKS, &[])?;
        self.list::<VlanNetworksDto>(url).await
    }

    pub async fn get_private_network(
        &self,
        vdc: &VirtualDatacenterDto,
        network_id: i32,
    ) -> Result<Option<VlanNetworkDto>> {
        let url = self.resolve(vdc, rel::PRIVATE_NETWORKS, &[&network_id.to_string()])?;
        self.get_optional(url).await
    }

    pub async fn create_private_network(
        &self,
        vdc: &VirtualDatacenterDto,
        network: &VlanNetworkDto,
    ) -> Result<VlanNetworkDto> {
        let url = self.resolve(vdc, rel::PRIVATE_NETWORKS, &[])?;
        self.post(url, network).await
    }

    pub async fn get_default_network(&self, vdc: &VirtualDatacenterDto) -> Result<VlanNetworkDto> {
        let url = self.resolve(vdc, rel::DEFAULT_NETWORK, &[])?;
        self.get(url).await
    }

    pub async fn set_default_network(
        &self,
        vdc: &VirtualDatacenterDto,
        network: &VlanNetworkDto,
    ) -> Result<()> {
        let url = self.resolve(vdc, rel::DEFAULT_VLAN, &[])?;
        self.put_discarding(url, &binders::network_ref(network)?).await
    }

    pub async fn list_network_ips(&self, network: &VlanNetworkDto) -> Result<Vec<IpPoolManagementDto>> {
        let url = self.resolve(network, rel::IPS, &[])?;
        self.list::<IpsPoolManagementDto>(url).await
    }

    pub async fn search_network_ips(
        &self,
        network: &VlanNetworkDto,
        options: &IpOptions,
    ) -> Result<Vec<IpPoolManagementDto>> {
        let url = options.apply(self.resolve(network, rel::IPS, &[])?);
        self.list::<IpsPoolManagementDto>(url).await
    }

    // ===== Virtual appliances =====

    pub async fn list_virtual_appliances(
        &self,
        vdc: &VirtualDatacenterDto,
    ) -> Result<Vec<VirtualApplianceDto>> {
        let url = self.resolve(vdc, rel::VIRTUAL_APPLIANCES, &[])?;
        self.list::<VirtualAppliancesDto>(url).await
    }

    pub async fn get_virtual_appliance(
        &self,
        vdc: &VirtualDatacenterDto,
        id: i32,
    ) -> Result<Option<VirtualApplianceDto>> {
        let url = self.resolve(vdc, rel::VIRTUAL_APPLIANCES, &[&id.to_string()])?;
        self.get_optional(url).await
    }

    pub async fn create_virtual_appliance(
        &self,
        vdc: &VirtualDatacenterDto,
        vapp: &VirtualApplianceDto,
    ) -> Result<VirtualApplianceDto> {
        let url = self.resolve(vdc, rel::VIRTUAL_APPLIANCES, &[])?;
        self.post(url, vapp).await
    }

    pub async fn get_virtual_appliance_state(
        &self,
        vapp: &VirtualApplianceDto,
    ) -> Result<VirtualApplianceStateDto> {
        let url = self.resolve(vapp, rel::STATE, &[])?;
        self.get(url).await
    }

    pub async fn deploy_virtual_appliance(
        &self,
        vapp: &VirtualApplianceDto,
        options: &VirtualMachineTaskDto,
    ) -> Result<AcceptedRequestDto> {
        let url = self.resolve(vapp, rel::DEPLOY, &[])?;
        self.accepted_required(Method::POST, url, Some(options)).await
    }

    pub async fn undeploy_virtual_appliance(
        &self,
        vapp: &VirtualApplianceDto,
        options: &VirtualMachineTaskDto,
    ) -> Result<AcceptedRequestDto> {
        let url = self.resolve(vapp, rel::UNDEPLOY, &[])?;
        self.accepted_required(Method::POST, url, Some(options)).await
    }

    // ===== Virtual machines =====

    pub async fn list_virtual_machines(
        &self,
        vapp: &VirtualApplianceDto,
    ) -> Result<Vec<VirtualMachineDto>> {
        let url = self.resolve(vapp, rel::VIRTUAL_MACHINES, &[])?;
        self.list::<VirtualMachinesDto>(url).await
    }

    pub async fn get_virtual_machine(
        &self,
        vapp: &VirtualApplianceDto,
        id: i32,
    ) -> Result<Option<VirtualMachineDto>> {
        let url = self.resolve(vapp, rel::VIRTUAL_MACHINES, &[&id.to_string()])?;
        self.get_optional(url).await
    }

    pub async fn create_virtual_machine(
        &self,
        vapp: &VirtualApplianceDto,
        vm: &VirtualMachineDto,
    ) -> Result<VirtualMachineDto> {
        let url = self.resolve(vapp, rel::VIRTUAL_MACHINES, &[])?;
        self.post(url, vm).await
    }

    /// Reconfigure a virtual machine. Deployed machines are reconfigured
    /// asynchronously and yield a task reference.
    pub async fn update_virtual_machine(
        &self,
        vm: &VirtualMachineDto,
    ) -> Result<Option<AcceptedRequestDto>> {
        let url = self.resolve(vm, rel::EDIT, &[])?;
        self.accepted(Method::PUT, url, Some(vm)).await
    }

    pub async fn get_virtual_machine_state(
        &self,
        vm: &VirtualMachineDto,
    ) -> Result<VirtualMachineStateDto> {
        let url = self.resolve(vm, rel::STATE, &[])?;
        self.get(url).await
    }

    pub async fn change_virtual_machine_state(
        &self,
        vm: &VirtualMachineDto,
        state: &VirtualMachineStateDto,
    ) -> Result<AcceptedRequestDto> {
        let url = self.resolve(vm, rel::STATE, &[])?;
        self.accepted_required(Method::PUT, url, Some(state)).await
    }

    pub async fn deploy_virtual_machine(
        &self,
        vm: &VirtualMachineDto,
        options: &VirtualMachineTaskDto,
    ) -> Result<AcceptedRequestDto> {
        let url = self.resolve(vm, rel::DEPLOY, &[])?;
        self.accepted_required(Method::POST, url, Some(options)).await
    }

    pub async fn undeploy_virtual_machine(
        &self,
        vm: &VirtualMachineDto,
        options: &VirtualMachineTaskDto,
    ) -> Result<AcceptedRequestDto> {
        let url = self.resolve(vm, rel::UNDEPLOY, &[])?;
        self.accepted_required(Method::POST, url, Some(options)).await
    }

    pub async fn get_virtual_machine_template(
        &self,
        vm: &VirtualMachineDto,
    ) -> Result<VirtualMachineTemplateDto> {
        let url = self.resolve(vm, rel::VIRTUAL_MACHINE_TEMPLATE, &[])?;
        self.get(url).await
    }

    // ===== Attached storage =====

    pub async fn list_attached_volumes(
        &self,
        vm: &VirtualMachineDto,
    ) -> Result<Vec<VolumeManagementDto>> {
        let url = self.resolve(vm, rel::VOLUMES, &[])?;
        self.list::<VolumesManagementDto>(url).await
    }

    pub async fn replace_volumes(
        &self,
        vm: &VirtualMachineDto,
        volumes: &[VolumeManagementDto],
    ) -> Result<Option<AcceptedRequestDto>> {
        let url = self.resolve(vm, rel::VOLUMES, &[])?;
        let payload = binders::volume_refs(volumes)?;
        self.accepted(Method::PUT, url, Some(&payload)).await
    }

    pub async fn detach_all_volumes(
        &self,
        vm: &VirtualMachineDto,
    ) -> Result<Option<AcceptedRequestDto>> {
        let url = self.resolve(vm, rel::VOLUMES, &[])?;
        self.accepted(Method::DELETE, url, None::<&LinksDto>).await
    }

    pub async fn list_attached_hard_disks(
        &self,
        vm: &VirtualMachineDto,
    ) -> Result<Vec<DiskManagementDto>> {
        let url = self.resolve(vm, rel::DISKS, &[])?;
        self.list::<DisksManagementDto>(url).await
    }

    pub async fn replace_hard_disks(
        &self,
        vm: &VirtualMachineDto,
        disks: &[DiskManagementDto],
    ) -> Result<Option<AcceptedRequestDto>> {
        let url = self.resolve(vm, rel::DISKS, &[])?;
        let payload = binders::hard_disk_refs(disks)?;
        self.accepted(Method::PUT, url, Some(&payload)).await
    }

    pub async fn detach_all_hard_disks(
        &self,
        vm: &VirtualMachineDto,
    ) -> Result<Option<AcceptedRequestDto>> {
        let url = self.resolve(vm, rel::DISKS, &[])?;
        self.accepted(Method::DELETE, url, None::<&LinksDto>).await
    }

    // ===== NICs =====

    pub async fn list_attached_nics(&self, vm: &VirtualMachineDto) -> Result<Vec<NicDto>> {
        let url = self.resolve(vm, rel::NICS, &[])?;
        self.list::<NicsDto>(url).await
    }

    pub async fn create_nic(
        &self,
        vm: &VirtualMachineDto,
        ip: &IpPoolManagementDto,
    ) -> Result<Option<AcceptedRequestDto>> {
        let url = self.resolve(vm, rel::NICS, &[])?;
        let payload = binders::ip_refs([ip])?;
        self.accepted(Method::POST, url, Some(&payload)).await
    }

    pub async fn replace_nics(
        &self,
        vm: &VirtualMachineDto,
        ips: &[IpPoolManagementDto],
    ) -> Result<Option<AcceptedRequestDto>> {
        let url = self.resolve(vm, rel::NICS, &[])?;
        let payload = binders::ip_refs(ips)?;
        self.accepted(Method::PUT, url, Some(&payload)).await
    }

    pub async fn delete_nic(&self, nic: &NicDto) -> Result<Option<AcceptedRequestDto>> {
        let url = self.resolve(nic, rel::EDIT, &[])?;
        self.accepted(Method::DELETE, url, None::<&LinksDto>).await
    }

    // ===== Virtual datacenter storage =====

    pub async fn list_volumes(&self, vdc: &VirtualDatacenterDto) -> Result<Vec<VolumeManagementDto>> {
        let url = self.resolve(vdc, rel::VOLUMES, &[])?;
        self.list::<VolumesManagementDto>(url).await
    }

    pub async fn search_volumes(
        &self,
        vdc: &VirtualDatacenterDto,
        options: &VolumeOptions,
    ) -> Result<Vec<VolumeManagementDto>> {
        let url = options.apply(self.resolve(vdc, rel::VOLUMES, &[])?);
        self.list::<VolumesManagementDto>(url).await
    }

    pub async fn get_volume(
        &self,
        vdc: &VirtualDatacenterDto,
        id: i32,
    ) -> Result<Option<VolumeManagementDto>> {
        let url = self.resolve(vdc, rel::VOLUMES, &[&id.to_string()])?;
        self.get_optional(url).await
    }

    pub async fn create_volume(
        &self,
        vdc: &VirtualDatacenterDto,
        volume: &VolumeManagementDto,
    ) -> Result<VolumeManagementDto> {
        let url = self.resolve(vdc, rel::VOLUMES, &[])?;
        self.post(url, volume).await
    }

    pub async fn list_hard_disks(&self, vdc: &VirtualDatacenterDto) -> Result<Vec<DiskManagementDto>> {
        let url = self.resolve(vdc, rel::DISKS, &[])?;
        self.list::<DisksManagementDto>(url).await
    }

    pub async fn get_hard_disk(
        &self,
        vdc: &VirtualDatacenterDto,
        id: i32,
    ) -> Result<Option<DiskManagementDto>> {
        let url = self.resolve(vdc, rel::DISKS, &[&id.to_string()])?;
        self.get_optional(url).await
    }

    pub async fn create_hard_disk(
        &self,
        vdc: &VirtualDatacenterDto,
        disk: &DiskManagementDto,
    ) -> Result<DiskManagementDto> {
        let url = self.resolve(vdc, rel::DISKS, &[])?;
        self.post(url, disk).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;

    use super::*;
    use crate::auth::Credentials;
    use crate::link::RestLink;
    use crate::mock::MockTransport;

    const VM: &str = "http://localhost/api/cloud/virtualdatacenters/1/virtualappliances/1/virtualmachines/1";

    fn client(mock: &MockTransport) -> Client {
        Client::builder("http://localhost/api", Credentials::token("t0k3n"))
            .transport(Arc::new(mock.clone()))
            .build()
            .unwrap()
    }

    fn vm() -> VirtualMachineDto {
        VirtualMachineDto {
            links: vec![
                RestLink::new("edit", VM),
                RestLink::new("state", format!("{VM}/state")),
                RestLink::new("volumes", format!("{VM}/storage/volumes")),
            ]
            .into(),
            name: Some("vm".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_virtual_datacenter_options_query() {
        assert_eq!(VirtualDatacenterOptions::default().query(), "");
        assert_eq!(
            VirtualDatacenterOptions::default().datacenter(1).enterprise(2).query(),
            "?datacenter=1&enterprise=2"
        );
        assert_eq!(VirtualDatacenterOptions::default().enterprise(2).query(), "?enterprise=2");
    }

    #[tokio::test]
    async fn test_search_volumes_appends_options_to_link() {
        let mock = MockTransport::new();
        let vdc_url = "http://localhost/api/cloud/virtualdatacenters/1";
        mock.on(
            Method::GET,
            &format!("{vdc_url}/volumes?available=true&has=data"),
            StatusCode::OK,
            "<volumes><volume><id>10</id><name>data</name></volume></volumes>",
        );
        let vdc = VirtualDatacenterDto {
            links: vec![
                RestLink::new("edit", vdc_url),
                RestLink::new("volumes", format!("{vdc_url}/volumes")),
            ]
            .into(),
            ..Default::default()
        };

        let found = client(&mock)
            .search_volumes(&vdc, &VolumeOptions::default().only_available().has("data"))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, Some(10));
    }

    #[tokio::test]
    async fn test_missing_vdc_is_none() {
        let mock = MockTransport::new();
        let found = client(&mock).get_virtual_datacenter(42).await.unwrap();

        assert!(found.is_none());
        assert_eq!(
            mock.requests()[0].url.as_str(),
            "http://localhost/api/cloud/virtualdatacenters/42"
        );
    }

    #[tokio::test]
    async fn test_missing_link_fails_before_sending() {
        let mock = MockTransport::new();
        let err = client(&mock)
            .list_attached_nics(&vm())
            .await
            .unwrap_err();

        assert!(matches!(err, crate::Error::MissingLink(ref m) if m.rel == "nics"));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_change_state_returns_task_reference() {
        let mock = MockTransport::new();
        mock.on(
            Method::PUT,
            &format!("{VM}/state"),
            StatusCode::ACCEPTED,
            &format!(
                "<acceptedrequest><link rel=\"status\" href=\"{VM}/tasks/abc\"/><message>accepted</message></acceptedrequest>"
            ),
        );
        let client = client(&mock);
        let state = VirtualMachineStateDto {
            state: VirtualMachineState::Off,
        };

        let accepted = client.change_virtual_machine_state(&vm(), &state).await.unwrap();

        assert_eq!(accepted.link(rel::STATUS).unwrap().last_segment(), Some("abc"));
        let body = mock.requests()[0].body.clone().unwrap();
        assert_eq!(body, "<virtualmachinestate><state>OFF</state></virtualmachinestate>");
    }

    #[tokio::test]
    async fn test_change_state_without_task_is_protocol_error() {
        let mock = MockTransport::new();
        mock.on(Method::PUT, &format!("{VM}/state"), StatusCode::NO_CONTENT, "");
        let state = VirtualMachineStateDto {
            state: VirtualMachineState::On,
        };

        let err = client(&mock)
            .change_virtual_machine_state(&vm(), &state)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Protocol(_)));
    }

    #[tokio::test]
    async fn test_detach_all_volumes_synchronously() {
        let mock = MockTransport::new();
        mock.on(Method::DELETE, &format!("{VM}/storage/volumes"), StatusCode::NO_CONTENT, "");

        let accepted = client(&mock).detach_all_volumes(&vm()).await.unwrap();

        assert!(accepted.is_none());
        assert!(mock.requests()[0].body.is_none());
    }
}
