//! Networks, their IP pools and the NICs of virtual machines.

mod ip;
mod nic;
mod vlan;

pub use ip::Ip;
pub use nic::{ExternalNic, Nic, PrivateNic, PublicNic, UnmanagedNic};
pub use vlan::{
    ExternalNetwork, Network, NetworkCore, PrivateNetwork, PrivateNetworkBuilder, PublicNetwork,
    UnmanagedNetwork,
};
