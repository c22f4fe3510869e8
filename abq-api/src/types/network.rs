use std::fmt;

use serde::{Deserialize, Serialize};

use super::{collection, resource};
use crate::link::LinkSet;

/// Type tag of a VLAN network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkType {
    Internal,
    External,
    ExternalUnmanaged,
    Public,
    Unmanaged,
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::External => "EXTERNAL",
            Self::ExternalUnmanaged => "EXTERNAL_UNMANAGED",
            Self::Public => "PUBLIC",
            Self::Unmanaged => "UNMANAGED",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "network")]
pub struct VlanNetworkDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "defaultNetwork", default, skip_serializing_if = "Option::is_none")]
    pub default_network: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "primaryDNS", default, skip_serializing_if = "Option::is_none")]
    pub primary_dns: Option<String>,
    #[serde(rename = "secondaryDNS", default, skip_serializing_if = "Option::is_none")]
    pub secondary_dns: Option<String>,
    #[serde(rename = "sufixDNS", default, skip_serializing_if = "Option::is_none")]
    pub sufix_dns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unmanaged: Option<bool>,
    #[serde(rename = "type")]
    pub network_type: NetworkType,
}

impl VlanNetworkDto {
    pub fn new(network_type: NetworkType) -> Self {
        Self {
            links: LinkSet::new(),
            id: None,
            address: None,
            default_network: None,
            gateway: None,
            mask: None,
            name: None,
            primary_dns: None,
            secondary_dns: None,
            sufix_dns: None,
            tag: None,
            unmanaged: None,
            network_type,
        }
    }
}

resource!(VlanNetworkDto, "Network");
collection!(VlanNetworksDto, "networks", "network", VlanNetworkDto);

/// An IP address of a network pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "ipPoolManagement")]
pub struct IpPoolManagementDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "networkName", default, skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    #[serde(default)]
    pub quarantine: bool,
    #[serde(default)]
    pub available: bool,
}

resource!(IpPoolManagementDto, "Ip");
collection!(IpsPoolManagementDto, "ipsPoolManagement", "ipPoolManagement", IpPoolManagementDto);

/// A network interface attached to a virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "nic")]
pub struct NicDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i32>,
}

resource!(NicDto, "Nic");
collection!(NicsDto, "nics", "nic", NicDto);
