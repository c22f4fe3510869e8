//! Cloud resources: virtual datacenters and everything deployed in them.

mod hard_disk;
mod template;
mod tier;
mod virtual_appliance;
mod virtual_datacenter;
mod virtual_machine;
mod volume;

pub use hard_disk::{HardDisk, HardDiskBuilder};
pub use template::VirtualMachineTemplate;
pub use tier::Tier;
pub use virtual_appliance::{VirtualAppliance, VirtualApplianceBuilder};
pub use virtual_datacenter::{VirtualDatacenter, VirtualDatacenterBuilder};
pub use virtual_machine::{VirtualMachine, VirtualMachineBuilder};
pub use volume::{DEFAULT_VOLUME_STATE, Volume, VolumeBuilder};
