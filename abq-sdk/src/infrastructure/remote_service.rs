use abq_api::link::rel;
use abq_api::types::{DatacenterDto, RemoteServiceDto, RemoteServiceType};
use tracing::{debug, info};

use crate::context::AbiquoContext;
use crate::error::{Error, Result};
use crate::infrastructure::Datacenter;
use crate::wrapper::{DomainWrapper, wrapper};

/// A platform service deployed for a datacenter.
#[derive(Debug, Clone)]
pub struct RemoteService {
    inner: DomainWrapper<RemoteServiceDto>,
    datacenter: Option<DatacenterDto>,
}

wrapper!(RemoteService, RemoteServiceDto);

impl RemoteService {
    fn from_inner(inner: DomainWrapper<RemoteServiceDto>) -> Self {
        Self {
            inner,
            datacenter: None,
        }
    }

    pub fn builder(datacenter: &Datacenter, service_type: RemoteServiceType) -> Result<RemoteServiceBuilder> {
        Ok(RemoteServiceBuilder {
            ctx: datacenter.context().clone(),
            datacenter: datacenter.inner().require_persisted()?.clone(),
            service_type,
            uri: None,
            status: 0,
        })
    }

    /// `protocol://ip:port/mapping` for a service of type `service_type`.
    pub fn generate_uri(ip: &str, port: u16, service_type: RemoteServiceType) -> String {
        format!(
            "{}{ip}:{port}/{}",
            service_type.default_protocol(),
            service_type.service_mapping()
        )
    }

    /// Like [`generate_uri`](Self::generate_uri), on the default port of
    /// the service type.
    pub fn generate_default_uri(ip: &str, service_type: RemoteServiceType) -> String {
        Self::generate_uri(ip, service_type.default_port(), service_type)
    }

    pub async fn save(&mut self) -> Result<()> {
        let datacenter = self.datacenter.as_ref().ok_or_else(|| {
            Error::validation("remote service was not built with a parent datacenter")
        })?;
        let created = self
            .context()
            .api()
            .create_remote_service(datacenter, self.inner.target()?)
            .await?;
        info!(service_type = %created.service_type, uri = ?created.uri, "created remote service");
        self.inner.replace(created);
        Ok(())
    }

    pub async fn update(&mut self) -> Result<()> {
        self.inner.update().await
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.inner.delete().await
    }

    /// Ask the server whether the service answers. A service that fails the
    /// check is reported as unavailable, not as an error.
    pub async fn check(&self) -> Result<bool> {
        let target = self.target()?;
        if !target.service_type.checkable() {
            return Err(Error::Unsupported(format!(
                "{} cannot be checked",
                target.service_type
            )));
        }
        let available = self.context().api().is_remote_service_available(target).await?;
        debug!(service_type = %target.service_type, available, "checked remote service");
        Ok(available)
    }

    pub async fn datacenter(&self) -> Result<Option<Datacenter>> {
        let id = self.inner.id_from_link(rel::DATACENTER)?;
        let found = self.context().api().get_datacenter(id).await?;
        Ok(found.map(|dto| Datacenter::wrap(self.context(), dto)))
    }

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn service_type(&self) -> Result<RemoteServiceType> {
        Ok(self.target()?.service_type)
    }

    pub fn uri(&self) -> Result<Option<&str>> {
        Ok(self.target()?.uri.as_deref())
    }

    pub fn status(&self) -> Result<i32> {
        Ok(self.target()?.status)
    }

    pub fn set_uri(&mut self, uri: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.uri = Some(uri.into());
        Ok(())
    }

    pub fn set_status(&mut self, status: i32) -> Result<()> {
        self.inner.target_mut()?.status = status;
        Ok(())
    }
}

#[derive(Debug)]
pub struct RemoteServiceBuilder {
    ctx: AbiquoContext,
    datacenter: DatacenterDto,
    service_type: RemoteServiceType,
    uri: Option<String>,
    status: i32,
}

impl RemoteServiceBuilder {
    /// A builder carrying the settings of `remote_service`, which must come
    /// from a builder so that its datacenter is known.
    pub fn from_remote_service(remote_service: &RemoteService) -> Result<Self> {
        let dto = remote_service.target()?;
        let datacenter = remote_service.datacenter.clone().ok_or_else(|| {
            Error::validation("remote service does not carry its datacenter")
        })?;
        Ok(Self {
            ctx: remote_service.context().clone(),
            datacenter,
            service_type: dto.service_type,
            uri: dto.uri.clone(),
            status: dto.status,
        })
    }

    pub fn service_type(mut self, service_type: RemoteServiceType) -> Self {
        self.service_type = service_type;
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    /// Move the service to another (persisted) datacenter.
    pub fn datacenter(mut self, datacenter: &Datacenter) -> Result<Self> {
        self.datacenter = datacenter.inner().require_persisted()?.clone();
        Ok(self)
    }

    pub fn build(self) -> RemoteService {
        let dto = RemoteServiceDto {
            links: Default::default(),
            id: None,
            uri: self.uri,
            service_type: self.service_type,
            status: self.status,
        };
        RemoteService {
            inner: DomainWrapper::new(self.ctx, dto),
            datacenter: Some(self.datacenter),
        }
    }
}
