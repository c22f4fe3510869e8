//! Physical infrastructure: datacenters and the remote services that manage
//! them.

mod datacenter;
mod remote_service;

pub use datacenter::{Datacenter, DatacenterBuilder};
pub use remote_service::{RemoteService, RemoteServiceBuilder};
