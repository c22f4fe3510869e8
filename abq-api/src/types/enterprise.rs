use serde::{Deserialize, Serialize};

use super::{collection, resource};
use crate::link::LinkSet;

/// A tenant of the platform.
///
/// Every limit pair is a soft limit, which only raises a warning, and a hard
/// limit, which rejects the allocation. Zero means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "enterprise")]
pub struct EnterpriseDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "ramSoft", default)]
    pub ram_soft: i32,
    #[serde(rename = "ramHard", default)]
    pub ram_hard: i32,
    #[serde(rename = "cpuSoft", default)]
    pub cpu_soft: i32,
    #[serde(rename = "cpuHard", default)]
    pub cpu_hard: i32,
    #[serde(rename = "hdSoft", default)]
    pub hd_soft: i64,
    #[serde(rename = "hdHard", default)]
    pub hd_hard: i64,
    #[serde(rename = "storageSoft", default)]
    pub storage_soft: i64,
    #[serde(rename = "storageHard", default)]
    pub storage_hard: i64,
    #[serde(rename = "vlansSoft", default)]
    pub vlans_soft: i64,
    #[serde(rename = "vlansHard", default)]
    pub vlans_hard: i64,
    #[serde(rename = "publicIpsSoft", default)]
    pub public_ips_soft: i64,
    #[serde(rename = "publicIpsHard", default)]
    pub public_ips_hard: i64,
    /// Whether virtual machines may only run on machines reserved for the
    /// enterprise.
    #[serde(rename = "isReservationRestricted", default)]
    pub is_reservation_restricted: bool,
}

resource!(EnterpriseDto, "Enterprise");
collection!(EnterprisesDto, "enterprises", "enterprise", EnterpriseDto);

/// Limits of an enterprise in one datacenter. Their existence is what
/// allows the enterprise to use the datacenter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "limit")]
pub struct DatacenterLimitsDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(rename = "ramSoft", default)]
    pub ram_soft: i32,
    #[serde(rename = "ramHard", default)]
    pub ram_hard: i32,
    #[serde(rename = "cpuSoft", default)]
    pub cpu_soft: i32,
    #[serde(rename = "cpuHard", default)]
    pub cpu_hard: i32,
    #[serde(rename = "hdSoft", default)]
    pub hd_soft: i64,
    #[serde(rename = "hdHard", default)]
    pub hd_hard: i64,
    #[serde(rename = "storageSoft", default)]
    pub storage_soft: i64,
    #[serde(rename = "storageHard", default)]
    pub storage_hard: i64,
    #[serde(rename = "vlansSoft", default)]
    pub vlans_soft: i64,
    #[serde(rename = "vlansHard", default)]
    pub vlans_hard: i64,
    #[serde(rename = "publicIpsSoft", default)]
    pub public_ips_soft: i64,
    #[serde(rename = "publicIpsHard", default)]
    pub public_ips_hard: i64,
}

resource!(DatacenterLimitsDto, "Limits");
collection!(DatacentersLimitsDto, "limits", "limit", DatacenterLimitsDto);
