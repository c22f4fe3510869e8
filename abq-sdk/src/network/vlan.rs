use std::ops::{Deref, DerefMut};

use abq_api::IpOptions;
use abq_api::types::{NetworkType, VirtualDatacenterDto, VlanNetworkDto};
use tracing::info;

use crate::cloud::VirtualDatacenter;
use crate::context::AbiquoContext;
use crate::error::{Error, Result};
use crate::network::Ip;
use crate::wrapper::{DomainWrapper, filter, find_first, wrap_all, wrapper};

/// State and operations shared by every kind of network.
#[derive(Debug, Clone)]
pub struct NetworkCore {
    inner: DomainWrapper<VlanNetworkDto>,
}

wrapper!(NetworkCore, VlanNetworkDto);

impl NetworkCore {
    fn from_inner(inner: DomainWrapper<VlanNetworkDto>) -> Self {
        Self { inner }
    }

    // ===== IP pool =====

    pub async fn list_ips(&self) -> Result<Vec<Ip>> {
        let dtos = self.context().api().list_network_ips(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, Ip::wrap))
    }

    /// One page of the IP pool.
    pub async fn search_ips(&self, options: &IpOptions) -> Result<Vec<Ip>> {
        let dtos = self
            .context()
            .api()
            .search_network_ips(self.target()?, options)
            .await?;
        Ok(wrap_all(self.context(), dtos, Ip::wrap))
    }

    pub async fn list_ips_matching(&self, predicate: impl Fn(&Ip) -> bool) -> Result<Vec<Ip>> {
        Ok(filter(self.list_ips().await?, predicate))
    }

    pub async fn find_ip(&self, predicate: impl Fn(&Ip) -> bool) -> Result<Option<Ip>> {
        Ok(find_first(self.list_ips().await?, predicate))
    }

    /// Addresses not yet bound to a NIC.
    pub async fn list_available_ips(&self) -> Result<Vec<Ip>> {
        self.list_ips_matching(crate::predicates::ip::available()).await
    }

    pub async fn find_available_ip(&self, predicate: impl Fn(&Ip) -> bool) -> Result<Option<Ip>> {
        Ok(find_first(self.list_available_ips().await?, predicate))
    }

    // ===== Delegate methods =====

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.target()?.name.as_deref())
    }

    pub fn network_type(&self) -> Result<NetworkType> {
        Ok(self.target()?.network_type)
    }

    pub fn address(&self) -> Result<Option<&str>> {
        Ok(self.target()?.address.as_deref())
    }

    pub fn mask(&self) -> Result<Option<i32>> {
        Ok(self.target()?.mask)
    }

    pub fn gateway(&self) -> Result<Option<&str>> {
        Ok(self.target()?.gateway.as_deref())
    }

    pub fn tag(&self) -> Result<Option<i32>> {
        Ok(self.target()?.tag)
    }

    pub fn primary_dns(&self) -> Result<Option<&str>> {
        Ok(self.target()?.primary_dns.as_deref())
    }

    pub fn secondary_dns(&self) -> Result<Option<&str>> {
        Ok(self.target()?.secondary_dns.as_deref())
    }

    pub fn dns_suffix(&self) -> Result<Option<&str>> {
        Ok(self.target()?.sufix_dns.as_deref())
    }

    pub fn default_network(&self) -> Result<bool> {
        Ok(self.target()?.default_network.unwrap_or(false))
    }

    pub fn unmanaged(&self) -> Result<bool> {
        Ok(self.target()?.unmanaged.unwrap_or(false))
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.name = Some(name.into());
        Ok(())
    }

    pub fn set_gateway(&mut self, gateway: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.gateway = Some(gateway.into());
        Ok(())
    }

    pub fn set_primary_dns(&mut self, dns: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.primary_dns = Some(dns.into());
        Ok(())
    }

    pub fn set_secondary_dns(&mut self, dns: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.secondary_dns = Some(dns.into());
        Ok(())
    }

    pub fn set_dns_suffix(&mut self, suffix: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.sufix_dns = Some(suffix.into());
        Ok(())
    }

    pub fn set_default_network(&mut self, default_network: bool) -> Result<()> {
        self.inner.target_mut()?.default_network = Some(default_network);
        Ok(())
    }
}

macro_rules! network_variant {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            core: NetworkCore,
        }

        impl Deref for $name {
            type Target = NetworkCore;

            fn deref(&self) -> &NetworkCore {
                &self.core
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut NetworkCore {
                &mut self.core
            }
        }
    };
}

network_variant!(
    /// A public network of the datacenter.
    PublicNetwork
);
network_variant!(
    /// A network of the datacenter routed to the outside, owned by an
    /// enterprise.
    ExternalNetwork
);
network_variant!(
    /// A network whose addresses are not managed by the platform.
    UnmanagedNetwork
);

/// A network private to a virtual datacenter. The only kind a cloud user
/// can create.
#[derive(Debug, Clone)]
pub struct PrivateNetwork {
    core: NetworkCore,
    virtual_datacenter: Option<VirtualDatacenterDto>,
}

impl Deref for PrivateNetwork {
    type Target = NetworkCore;

    fn deref(&self) -> &NetworkCore {
        &self.core
    }
}

impl DerefMut for PrivateNetwork {
    fn deref_mut(&mut self) -> &mut NetworkCore {
        &mut self.core
    }
}

impl PrivateNetwork {
    pub fn builder(virtual_datacenter: &VirtualDatacenter) -> Result<PrivateNetworkBuilder> {
        Ok(PrivateNetworkBuilder {
            ctx: virtual_datacenter.context().clone(),
            virtual_datacenter: virtual_datacenter.inner().require_persisted()?.clone(),
            name: None,
            tag: None,
            gateway: None,
            address: None,
            mask: None,
            primary_dns: None,
            secondary_dns: None,
            dns_suffix: None,
            default_network: None,
        })
    }

    pub async fn save(&mut self) -> Result<()> {
        let vdc = self.virtual_datacenter.as_ref().ok_or_else(|| {
            Error::validation("private network was not built with a parent virtual datacenter")
        })?;
        let created = self
            .core
            .context()
            .api()
            .create_private_network(vdc, self.core.target()?)
            .await?;
        info!(id = ?created.id, name = ?created.name, "created private network");
        self.core.inner.replace(created);
        Ok(())
    }

    pub async fn update(&mut self) -> Result<()> {
        self.core.inner.update().await
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.core.inner.delete().await
    }
}

/// Builder for [`PrivateNetwork`].
#[derive(Debug)]
pub struct PrivateNetworkBuilder {
    ctx: AbiquoContext,
    virtual_datacenter: VirtualDatacenterDto,
    name: Option<String>,
    tag: Option<i32>,
    gateway: Option<String>,
    address: Option<String>,
    mask: Option<i32>,
    primary_dns: Option<String>,
    secondary_dns: Option<String>,
    dns_suffix: Option<String>,
    default_network: Option<bool>,
}

impl PrivateNetworkBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn tag(mut self, tag: i32) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    /// Network address, e.g. `192.168.1.0`.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Prefix length of the network.
    pub fn mask(mut self, mask: i32) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn primary_dns(mut self, dns: impl Into<String>) -> Self {
        self.primary_dns = Some(dns.into());
        self
    }

    pub fn secondary_dns(mut self, dns: impl Into<String>) -> Self {
        self.secondary_dns = Some(dns.into());
        self
    }

    pub fn dns_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.dns_suffix = Some(suffix.into());
        self
    }

    pub fn default_network(mut self, default_network: bool) -> Self {
        self.default_network = Some(default_network);
        self
    }

    pub fn build(self) -> PrivateNetwork {
        let dto = VlanNetworkDto {
            name: self.name,
            tag: self.tag,
            gateway: self.gateway,
            address: self.address,
            mask: self.mask,
            primary_dns: self.primary_dns,
            secondary_dns: self.secondary_dns,
            sufix_dns: self.dns_suffix,
            default_network: self.default_network,
            ..VlanNetworkDto::new(NetworkType::Internal)
        };
        PrivateNetwork {
            core: NetworkCore::from_inner(DomainWrapper::new(self.ctx, dto)),
            virtual_datacenter: Some(self.virtual_datacenter),
        }
    }
}

/// A network of any kind, discriminated by its wire `type`.
#[derive(Debug, Clone)]
pub enum Network {
    Private(PrivateNetwork),
    Public(PublicNetwork),
    External(ExternalNetwork),
    Unmanaged(UnmanagedNetwork),
}

impl Network {
    /// Wrap a network returned by the API.
    ///
    /// External unmanaged networks have no wrapper and are rejected.
    pub fn wrap(ctx: &AbiquoContext, dto: VlanNetworkDto) -> Result<Self> {
        let network_type = dto.network_type;
        let core = NetworkCore::wrap(ctx, dto);
        Ok(match network_type {
            NetworkType::Internal => Self::Private(PrivateNetwork {
                core,
                virtual_datacenter: None,
            }),
            NetworkType::Public => Self::Public(PublicNetwork { core }),
            NetworkType::External => Self::External(ExternalNetwork { core }),
            NetworkType::Unmanaged => Self::Unmanaged(UnmanagedNetwork { core }),
            NetworkType::ExternalUnmanaged => {
                return Err(Error::Unsupported(format!(
                    "{} networks are not supported",
                    NetworkType::ExternalUnmanaged
                )));
            }
        })
    }

    /// The wire type this variant was built from.
    pub fn kind(&self) -> NetworkType {
        match self {
            Self::Private(_) => NetworkType::Internal,
            Self::Public(_) => NetworkType::Public,
            Self::External(_) => NetworkType::External,
            Self::Unmanaged(_) => NetworkType::Unmanaged,
        }
    }

    pub fn into_private(self) -> Result<PrivateNetwork> {
        match self {
            Self::Private(network) => Ok(network),
            other => Err(other.mismatch(NetworkType::Internal)),
        }
    }

    pub fn into_public(self) -> Result<PublicNetwork> {
        match self {
            Self::Public(network) => Ok(network),
            other => Err(other.mismatch(NetworkType::Public)),
        }
    }

    pub fn into_external(self) -> Result<ExternalNetwork> {
        match self {
            Self::External(network) => Ok(network),
            other => Err(other.mismatch(NetworkType::External)),
        }
    }

    pub fn into_unmanaged(self) -> Result<UnmanagedNetwork> {
        match self {
            Self::Unmanaged(network) => Ok(network),
            other => Err(other.mismatch(NetworkType::Unmanaged)),
        }
    }

    fn mismatch(&self, expected: NetworkType) -> Error {
        Error::InvalidNetworkType {
            expected,
            actual: self.kind(),
        }
    }
}

impl Deref for Network {
    type Target = NetworkCore;

    fn deref(&self) -> &NetworkCore {
        match self {
            Self::Private(network) => &network.core,
            Self::Public(network) => &network.core,
            Self::External(network) => &network.core,
            Self::Unmanaged(network) => &network.core,
        }
    }
}

#[cfg(test)]
mod tests {
    use abq_api::Credentials;

    use super::*;

    fn context() -> AbiquoContext {
        AbiquoContext::builder("http://abiquo.test/api", Credentials::basic("admin", "xabiquo"))
            .build()
            .unwrap()
    }

    fn network(network_type: NetworkType) -> VlanNetworkDto {
        VlanNetworkDto {
            name: Some("net".into()),
            ..VlanNetworkDto::new(network_type)
        }
    }

    #[test]
    fn test_wrap_picks_variant_by_type() {
        let ctx = context();
        let wrapped = Network::wrap(&ctx, network(NetworkType::Public)).unwrap();
        assert_eq!(wrapped.kind(), NetworkType::Public);
        assert_eq!(wrapped.name().unwrap(), Some("net"));
        assert!(wrapped.into_public().is_ok());
    }

    #[test]
    fn test_narrowing_to_wrong_type_fails() {
        let ctx = context();
        let wrapped = Network::wrap(&ctx, network(NetworkType::Internal)).unwrap();
        let err = wrapped.into_external().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidNetworkType {
                expected: NetworkType::External,
                actual: NetworkType::Internal,
            }
        ));
    }

    #[test]
    fn test_external_unmanaged_is_unsupported() {
        let ctx = context();
        let err = Network::wrap(&ctx, network(NetworkType::ExternalUnmanaged)).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }
}
