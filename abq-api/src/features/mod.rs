//! Endpoint functions, grouped by API area.
//!
//! Fixed entry points are addressed by path; everything else is reached by
//! following a named link of an entity already fetched. A missing link fails
//! locally with [`Error::MissingLink`](crate::Error::MissingLink) before any
//! request is sent.

mod cloud;
mod enterprise;
mod infrastructure;
mod options;
mod task;

pub use cloud::VirtualDatacenterOptions;
pub use options::{EnterpriseOptions, IpOptions, VolumeOptions};

use reqwest::Url;

use crate::client::Client;
use crate::error::Result;
use crate::types::Resource;

impl Client {
    /// URL of the `rel` link of `resource`, extended with `segments`.
    pub fn resolve<R: Resource>(&self, resource: &R, rel: &str, segments: &[&str]) -> Result<Url> {
        self.link_url(resource.link(rel)?, segments)
    }

    /// PUT an entity to its `edit` link and return the server representation.
    pub async fn update_resource<R: Resource>(&self, resource: &R) -> Result<R> {
        let url = self.resolve(resource, crate::link::rel::EDIT, &[])?;
        self.put(url, resource).await
    }

    /// DELETE an entity through its `edit` link.
    pub async fn delete_resource<R: Resource>(&self, resource: &R) -> Result<()> {
        let url = self.resolve(resource, crate::link::rel::EDIT, &[])?;
        self.delete(url).await
    }
}
