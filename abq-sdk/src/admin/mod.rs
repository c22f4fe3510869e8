//! Tenants: enterprises and the datacenters they are allowed to use.

mod enterprise;
mod limits;

pub use enterprise::{Enterprise, EnterpriseBuilder};
pub use limits::{Limits, ResourceLimits};
