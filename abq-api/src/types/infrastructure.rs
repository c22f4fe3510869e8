use std::fmt;

use serde::{Deserialize, Serialize};

use super::{collection, resource};
use crate::link::LinkSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "datacenter")]
pub struct DatacenterDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

resource!(DatacenterDto, "Datacenter");
collection!(DatacentersDto, "datacenters", "datacenter", DatacenterDto);

/// Kind of a platform remote service deployed in a datacenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteServiceType {
    NodeCollector,
    VirtualSystemMonitor,
    VirtualFactory,
    StorageSystemMonitor,
    ApplianceManager,
    BpmService,
    DhcpService,
}

impl RemoteServiceType {
    pub const ALL: [RemoteServiceType; 7] = [
        Self::NodeCollector,
        Self::VirtualSystemMonitor,
        Self::VirtualFactory,
        Self::StorageSystemMonitor,
        Self::ApplianceManager,
        Self::BpmService,
        Self::DhcpService,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::NodeCollector => "Node Collector",
            Self::VirtualSystemMonitor => "Virtual System Monitor",
            Self::VirtualFactory => "Virtual Factory",
            Self::StorageSystemMonitor => "Storage System Monitor",
            Self::ApplianceManager => "Appliance Manager",
            Self::BpmService => "Business Process Manager",
            Self::DhcpService => "DHCP Service",
        }
    }

    /// Path segment under which the service is published, also used as the
    /// service identifier in `remoteservices/{mapping}` links.
    pub fn service_mapping(&self) -> &'static str {
        match self {
            Self::NodeCollector => "nodecollector",
            Self::VirtualSystemMonitor => "vsm",
            Self::VirtualFactory => "virtualfactory",
            Self::StorageSystemMonitor => "ssm",
            Self::ApplianceManager => "am",
            Self::BpmService => "bpm-async",
            Self::DhcpService => "dhcp",
        }
    }

    pub fn default_protocol(&self) -> &'static str {
        match self {
            Self::BpmService => "tcp://",
            Self::DhcpService => "omapi://",
            _ => "http://",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::BpmService => 61616,
            Self::DhcpService => 7911,
            _ => 80,
        }
    }

    /// Whether the service can be checked through its `check` link.
    pub fn checkable(&self) -> bool {
        !matches!(self, Self::BpmService | Self::DhcpService)
    }
}

impl fmt::Display for RemoteServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "remoteService")]
pub struct RemoteServiceDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "type")]
    pub service_type: RemoteServiceType,
    #[serde(default)]
    pub status: i32,
}

resource!(RemoteServiceDto, "RemoteService");
collection!(RemoteServicesDto, "remoteServices", "remoteService", RemoteServiceDto);
