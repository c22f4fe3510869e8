use std::fmt;

use serde::{Deserialize, Serialize};

use super::{collection, resource};
use crate::link::LinkSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "virtualDatacenter")]
pub struct VirtualDatacenterDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "hypervisorType", default, skip_serializing_if = "Option::is_none")]
    pub hypervisor_type: Option<String>,
}

resource!(VirtualDatacenterDto, "VirtualDatacenter");
collection!(VirtualDatacentersDto, "virtualDatacenters", "virtualDatacenter", VirtualDatacenterDto);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VirtualApplianceState {
    NotDeployed,
    Deployed,
    NeedsSync,
    Locked,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "virtualAppliance")]
pub struct VirtualApplianceDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<VirtualApplianceState>,
}

resource!(VirtualApplianceDto, "VirtualAppliance");
collection!(VirtualAppliancesDto, "virtualAppliances", "virtualAppliance", VirtualApplianceDto);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "virtualApplianceState")]
pub struct VirtualApplianceStateDto {
    pub power: VirtualApplianceState,
}

/// Hypervisor-level state of a virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VirtualMachineState {
    NotAllocated,
    Allocated,
    Configured,
    On,
    Paused,
    Off,
    Locked,
    Unknown,
}

impl VirtualMachineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAllocated => "NOT_ALLOCATED",
            Self::Allocated => "ALLOCATED",
            Self::Configured => "CONFIGURED",
            Self::On => "ON",
            Self::Paused => "PAUSED",
            Self::Off => "OFF",
            Self::Locked => "LOCKED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Numeric identifier used by the `idState` field.
    pub fn id(&self) -> i32 {
        match self {
            Self::NotAllocated => 1,
            Self::Allocated => 2,
            Self::Configured => 3,
            Self::On => 4,
            Self::Paused => 5,
            Self::Off => 6,
            Self::Locked => 7,
            Self::Unknown => 8,
        }
    }
}

impl fmt::Display for VirtualMachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "virtualMachine")]
pub struct VirtualMachineDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<i32>,
    #[serde(rename = "hdInBytes", default, skip_serializing_if = "Option::is_none")]
    pub hd_in_bytes: Option<i64>,
    #[serde(rename = "vdrpPort", default, skip_serializing_if = "Option::is_none")]
    pub vdrp_port: Option<i32>,
    #[serde(rename = "vdrpIP", default, skip_serializing_if = "Option::is_none")]
    pub vdrp_ip: Option<String>,
    #[serde(rename = "idState", default, skip_serializing_if = "Option::is_none")]
    pub id_state: Option<i32>,
    #[serde(rename = "idType", default, skip_serializing_if = "Option::is_none")]
    pub id_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<VirtualMachineState>,
}

resource!(VirtualMachineDto, "VirtualMachine");
collection!(VirtualMachinesDto, "virtualMachines", "virtualMachine", VirtualMachineDto);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "virtualmachinestate")]
pub struct VirtualMachineStateDto {
    pub state: VirtualMachineState,
}

/// Options of a deploy/undeploy request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "virtualmachinetask")]
pub struct VirtualMachineTaskDto {
    #[serde(rename = "forceEnterpriseSoftLimits", default)]
    pub force_enterprise_soft_limits: bool,
    #[serde(rename = "forceUndeploy", default)]
    pub force_undeploy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "virtualMachineTemplate")]
pub struct VirtualMachineTemplateDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "cpuRequired", default, skip_serializing_if = "Option::is_none")]
    pub cpu_required: Option<i32>,
    #[serde(rename = "ramRequired", default, skip_serializing_if = "Option::is_none")]
    pub ram_required: Option<i32>,
    #[serde(rename = "hdRequired", default, skip_serializing_if = "Option::is_none")]
    pub hd_required: Option<i64>,
    #[serde(rename = "diskFormatType", default, skip_serializing_if = "Option::is_none")]
    pub disk_format_type: Option<String>,
}

resource!(VirtualMachineTemplateDto, "VirtualMachineTemplate");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tier")]
pub struct TierDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

resource!(TierDto, "Tier");
collection!(TiersDto, "tiers", "tier", TierDto);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "volume")]
pub struct VolumeManagementDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "sizeInMB", default, skip_serializing_if = "Option::is_none")]
    pub size_in_mb: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

resource!(VolumeManagementDto, "Volume");
collection!(VolumesManagementDto, "volumes", "volume", VolumeManagementDto);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "disk")]
pub struct DiskManagementDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(rename = "sizeInMb", default, skip_serializing_if = "Option::is_none")]
    pub size_in_mb: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i32>,
}

resource!(DiskManagementDto, "HardDisk");
collection!(DisksManagementDto, "disks", "disk", DiskManagementDto);
