use reqwest::Method;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::link::rel;
use crate::types::*;

impl Client {
    pub async fn list_datacenters(&self) -> Result<Vec<DatacenterDto>> {
        let url = self.url("/admin/datacenters")?;
        self.list::<DatacentersDto>(url).await
    }

    pub async fn get_datacenter(&self, id: i32) -> Result<Option<DatacenterDto>> {
        let url = self.url(&format!("/admin/datacenters/{id}"))?;
        self.get_optional(url).await
    }

    pub async fn create_datacenter(&self, datacenter: &DatacenterDto) -> Result<DatacenterDto> {
        let url = self.url("/admin/datacenters")?;
        self.post(url, datacenter).await
    }

    pub async fn list_remote_services(
        &self,
        datacenter: &DatacenterDto,
    ) -> Result<Vec<RemoteServiceDto>> {
        let url = self.resolve(datacenter, rel::REMOTE_SERVICES, &[])?;
        self.list::<RemoteServicesDto>(url).await
    }

    /// Remote services are addressed by their type mapping, not by id.
    pub async fn get_remote_service(
        &self,
        datacenter: &DatacenterDto,
        service_type: RemoteServiceType,
    ) -> Result<Option<RemoteServiceDto>> {
        let url = self.resolve(
            datacenter,
            rel::REMOTE_SERVICES,
            &[service_type.service_mapping()],
        )?;
        self.get_optional(url).await
    }

    pub async fn create_remote_service(
        &self,
        datacenter: &DatacenterDto,
        remote_service: &RemoteServiceDto,
    ) -> Result<RemoteServiceDto> {
        let url = self.resolve(datacenter, rel::REMOTE_SERVICES, &[])?;
        self.post(url, remote_service).await
    }

    /// Ask the server to check a remote service.
    ///
    /// Any error status means the service is not reachable; transport and
    /// local failures are still reported as errors.
    pub async fn is_remote_service_available(&self, remote_service: &RemoteServiceDto) -> Result<bool> {
        let url = self.resolve(remote_service, rel::CHECK, &[])?;
        match self.execute(Method::GET, url, None).await {
            Ok(_) => Ok(true),
            Err(Error::Status { .. }) => Ok(false),
            Err(err) => Err(err),
        }
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

    const DC: &str = "http://localhost/api/admin/datacenters/1";

    fn client(mock: &MockTransport) -> Client {
        Client::builder("http://localhost/api", Credentials::basic("admin", "xabiquo"))
            .transport(Arc::new(mock.clone()))
            .build()
            .unwrap()
    }

    fn datacenter() -> DatacenterDto {
        DatacenterDto {
            links: vec![
                RestLink::new("edit", DC),
                RestLink::new("remoteservices", format!("{DC}/remoteservices")),
            ]
            .into(),
            id: Some(1),
            name: Some("dc".into()),
            location: Some("Barcelona".into()),
        }
    }

    #[tokio::test]
    async fn test_list_datacenters_decodes_collection() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "http://localhost/api/admin/datacenters",
            StatusCode::OK,
            &format!(
                "<datacenters><datacenter><link rel=\"edit\" href=\"{DC}\"/><id>1</id><name>dc</name><location>Barcelona</location></datacenter></datacenters>"
            ),
        );

        let datacenters = client(&mock).list_datacenters().await.unwrap();

        assert_eq!(datacenters.len(), 1);
        assert_eq!(datacenters[0].name.as_deref(), Some("dc"));
        assert_eq!(datacenters[0].edit_link().unwrap().href, DC);
    }

    #[tokio::test]
    async fn test_remote_service_is_addressed_by_mapping() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            &format!("{DC}/remoteservices/vsm"),
            StatusCode::OK,
            "<remoteService><id>3</id><uri>http://10.60.1.4:80/vsm</uri><type>VIRTUAL_SYSTEM_MONITOR</type><status>1</status></remoteService>",
        );

        let rs = client(&mock)
            .get_remote_service(&datacenter(), RemoteServiceType::VirtualSystemMonitor)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(rs.service_type, RemoteServiceType::VirtualSystemMonitor);
        assert_eq!(rs.status, 1);
    }

    #[tokio::test]
    async fn test_failed_check_means_unavailable() {
        let mock = MockTransport::new();
        let check = format!("{DC}/remoteservices/nodecollector/action/check");
        mock.on(Method::GET, &check, StatusCode::PRECONDITION_FAILED, "");
        let rs = RemoteServiceDto {
            links: vec![RestLink::new("check", check)].into(),
            id: Some(2),
            uri: None,
            service_type: RemoteServiceType::NodeCollector,
            status: 0,
        };

        assert!(!client(&mock).is_remote_service_available(&rs).await.unwrap());
    }
}
