use std::ops::Deref;

use abq_api::link::rel;
use abq_api::types::{NicDto, VlanNetworkDto};

use crate::error::Result;
use crate::network::{ExternalNetwork, Network, PrivateNetwork, PublicNetwork, UnmanagedNetwork};
use crate::task::AsyncTask;
use crate::wrapper::{DomainWrapper, wrapper};

/// Relations a NIC may use to point at its network, in lookup order.
const NETWORK_RELS: [&str; 4] = [
    rel::PRIVATE_NETWORK,
    rel::PUBLIC_NETWORK,
    rel::EXTERNAL_NETWORK,
    rel::UNMANAGED_NETWORK,
];

/// A network interface attached to a virtual machine.
///
/// The kind of network it is plugged into is only known through its links;
/// use the `into_*` methods to narrow it.
#[derive(Debug, Clone)]
pub struct Nic {
    inner: DomainWrapper<NicDto>,
}

wrapper!(Nic, NicDto);

impl Nic {
    fn from_inner(inner: DomainWrapper<NicDto>) -> Self {
        Self { inner }
    }

    /// Detach the NIC from its virtual machine.
    pub async fn delete(&mut self) -> Result<Option<AsyncTask>> {
        let accepted = self.context().api().delete_nic(self.target()?).await?;
        self.inner.mark_deleted();
        AsyncTask::from_accepted(self.context(), accepted).await
    }

    /// The network the NIC is plugged into.
    pub async fn network(&self) -> Result<Network> {
        let target = self.target()?;
        let relation = NETWORK_RELS
            .into_iter()
            .find(|relation| target.links.contains(relation))
            .unwrap_or(rel::PRIVATE_NETWORK);
        self.network_at(relation).await
    }

    async fn network_at(&self, relation: &str) -> Result<Network> {
        let api = self.context().api();
        let url = api.resolve(self.target()?, relation, &[])?;
        let dto = api.get::<VlanNetworkDto>(url).await?;
        Network::wrap(self.context(), dto)
    }

    pub fn into_private(self) -> Result<PrivateNic> {
        self.inner.link(rel::PRIVATE_NETWORK)?;
        Ok(PrivateNic { nic: self })
    }

    pub fn into_public(self) -> Result<PublicNic> {
        self.inner.link(rel::PUBLIC_NETWORK)?;
        Ok(PublicNic { nic: self })
    }

    pub fn into_external(self) -> Result<ExternalNic> {
        self.inner.link(rel::EXTERNAL_NETWORK)?;
        Ok(ExternalNic { nic: self })
    }

    pub fn into_unmanaged(self) -> Result<UnmanagedNic> {
        self.inner.link(rel::UNMANAGED_NETWORK)?;
        Ok(UnmanagedNic { nic: self })
    }

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn ip(&self) -> Result<Option<&str>> {
        Ok(self.target()?.ip.as_deref())
    }

    pub fn mac(&self) -> Result<Option<&str>> {
        Ok(self.target()?.mac.as_deref())
    }

    pub fn sequence(&self) -> Result<Option<i32>> {
        Ok(self.target()?.sequence)
    }
}

macro_rules! typed_nic {
    ($(#[$meta:meta])* $name:ident, $network:ident, $rel:expr, $narrow:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            nic: Nic,
        }

        impl $name {
            pub async fn network(&self) -> Result<$network> {
                self.nic.network_at($rel).await?.$narrow()
            }

            pub fn into_nic(self) -> Nic {
                self.nic
            }
        }

        impl Deref for $name {
            type Target = Nic;

            fn deref(&self) -> &Nic {
                &self.nic
            }
        }
    };
}

typed_nic!(
    /// A NIC in a private network of the virtual datacenter.
    PrivateNic,
    PrivateNetwork,
    rel::PRIVATE_NETWORK,
    into_private
);
typed_nic!(PublicNic, PublicNetwork, rel::PUBLIC_NETWORK, into_public);
typed_nic!(ExternalNic, ExternalNetwork, rel::EXTERNAL_NETWORK, into_external);
typed_nic!(UnmanagedNic, UnmanagedNetwork, rel::UNMANAGED_NETWORK, into_unmanaged);

#[cfg(test)]
mod tests {
    use abq_api::{Credentials, RestLink};

    use super::*;
    use crate::context::AbiquoContext;
    use crate::error::Error;

    fn nic(relation: &str) -> Nic {
        let ctx = AbiquoContext::builder("http://abiquo.test/api", Credentials::basic("u", "p"))
            .build()
            .unwrap();
        let mut dto = NicDto::default();
        dto.links.push(RestLink::new(
            relation,
            "http://abiquo.test/api/cloud/virtualdatacenters/1/privatenetworks/3",
        ));
        Nic::wrap(&ctx, dto)
    }

    #[test]
    fn test_narrowing_follows_links() {
        assert!(nic(rel::PRIVATE_NETWORK).into_private().is_ok());
        let err = nic(rel::PRIVATE_NETWORK).into_public().unwrap_err();
        assert!(matches!(err, Error::MissingLink(ref m) if m.rel == "publicnetwork"));
    }
}
