//! Hypermedia links carried by every Abiquo resource representation.
//!
//! Each entity embeds a list of `<link rel=".." href=".."/>` elements. The
//! relation name is the only way to reach related resources: parents,
//! children, actions and the entity itself (`edit` / `self`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known relation names used by the Abiquo API.
pub mod rel {
    pub const EDIT: &str = "edit";
    pub const SELF: &str = "self";
    pub const STATUS: &str = "status";
    pub const PARENT: &str = "parent";

    pub const DATACENTER: &str = "datacenter";
    pub const ENTERPRISE: &str = "enterprise";
    pub const ENTERPRISES: &str = "enterprises";
    pub const LIMITS: &str = "limits";
    /// Virtual datacenters of an enterprise.
    pub const CLOUD_VIRTUAL_DATACENTERS: &str = "cloud/virtualdatacenters";
    pub const VIRTUAL_DATACENTER: &str = "virtualdatacenter";
    pub const VIRTUAL_APPLIANCE: &str = "virtualappliance";
    pub const VIRTUAL_APPLIANCES: &str = "virtualappliances";
    pub const VIRTUAL_MACHINE: &str = "virtualmachine";
    pub const VIRTUAL_MACHINES: &str = "virtualmachines";
    pub const VIRTUAL_MACHINE_TEMPLATE: &str = "virtualmachinetemplate";
    pub const TIER: &str = "tier";
    pub const TIERS: &str = "tiers";
    pub const VOLUME: &str = "volume";
    pub const VOLUMES: &str = "volumes";
    pub const DISK: &str = "disk";
    pub const DISKS: &str = "disks";
    pub const NICS: &str = "nics";
    pub const IPS: &str = "ips";
    pub const PRIVATE_NETWORKS: &str = "privatenetworks";
    pub const PRIVATE_NETWORK: &str = "privatenetwork";
    pub const PUBLIC_NETWORK: &str = "publicnetwork";
    pub const EXTERNAL_NETWORK: &str = "externalnetwork";
    pub const UNMANAGED_NETWORK: &str = "unmanagednetwork";
    pub const INTERNAL_NETWORK: &str = "internalnetwork";
    pub const DEFAULT_NETWORK: &str = "defaultnetwork";
    pub const DEFAULT_VLAN: &str = "defaultvlan";
    pub const STATE: &str = "state";
    pub const DEPLOY: &str = "deploy";
    pub const UNDEPLOY: &str = "undeploy";
    pub const TASKS: &str = "tasks";
    pub const REMOTE_SERVICES: &str = "remoteservices";
    pub const CHECK: &str = "check";
}

/// A single named hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestLink {
    #[serde(rename = "@href")]
    pub href: String,
    #[serde(rename = "@rel")]
    pub rel: String,
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(rename = "@title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl RestLink {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            media_type: None,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Numeric identifier encoded as the last path segment of the href.
    pub fn id(&self) -> Option<i32> {
        self.last_segment()?.parse().ok()
    }

    /// Last non-empty path segment of the href, ignoring any query string.
    pub fn last_segment(&self) -> Option<&str> {
        let path = self.href.split(['?', '#']).next()?;
        path.trim_end_matches('/').rsplit('/').next().filter(|s| !s.is_empty())
    }
}

/// The relation a caller asked for is not present on an entity.
///
/// This is always a local failure: either the entity has not been persisted
/// yet, or the representation is stale or malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingLink {
    pub rel: String,
}

impl fmt::Display for MissingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required link: {}", self.rel)
    }
}

impl std::error::Error for MissingLink {}

/// The set of links embedded in an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkSet(Vec<RestLink>);

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestLink> {
        self.0.iter()
    }

    /// First link with the given relation, if any.
    pub fn find(&self, rel: &str) -> Option<&RestLink> {
        self.0.iter().find(|link| link.rel == rel)
    }

    /// Like [`find`](Self::find), but a missing relation is an error.
    pub fn require(&self, rel: &str) -> Result<&RestLink, MissingLink> {
        self.find(rel).ok_or_else(|| MissingLink {
            rel: rel.to_owned(),
        })
    }

    pub fn contains(&self, rel: &str) -> bool {
        self.find(rel).is_some()
    }

    /// Identifier of the resource behind `rel`, parsed from its href.
    pub fn id_from_link(&self, rel: &str) -> Result<i32, MissingLink> {
        self.require(rel)?.id().ok_or_else(|| MissingLink {
            rel: rel.to_owned(),
        })
    }

    pub fn push(&mut self, link: RestLink) {
        self.0.push(link);
    }

    /// Replace the href of `rel` in place, or append a new link.
    pub fn upsert(&mut self, rel: &str, href: impl Into<String>) {
        let href = href.into();
        match self.0.iter_mut().find(|link| link.rel == rel) {
            Some(link) => link.href = href,
            None => self.0.push(RestLink::new(rel, href)),
        }
    }

    pub fn remove(&mut self, rel: &str) {
        self.0.retain(|link| link.rel != rel);
    }
}

impl From<Vec<RestLink>> for LinkSet {
    fn from(links: Vec<RestLink>) -> Self {
        Self(links)
    }
}

impl FromIterator<RestLink> for LinkSet {
    fn from_iter<I: IntoIterator<Item = RestLink>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a RestLink;
    type IntoIter = std::slice::Iter<'a, RestLink>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
