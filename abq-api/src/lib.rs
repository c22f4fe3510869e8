//! Low-level typed client for the Abiquo cloud management API.
//!
//! The API is a hypermedia REST interface speaking `application/xml`. A few
//! entry points have fixed paths (`/cloud/virtualdatacenters`,
//! `/admin/datacenters`); everything else is reached through the named links
//! embedded in every entity.
//!
//! ```no_run
//! use abq_api::{Client, Credentials, VirtualDatacenterOptions};
//!
//! # async fn example() -> abq_api::Result<()> {
//! let client = Client::new("https://abiquo.example.com/api", Credentials::basic("admin", "xabiquo"))?;
//! for vdc in client.list_virtual_datacenters(VirtualDatacenterOptions::default()).await? {
//!     for vapp in client.list_virtual_appliances(&vdc).await? {
//!         println!("{:?} / {:?}", vdc.name, vapp.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod binders;
pub mod client;
pub mod error;
mod features;
pub mod link;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::{Client, ClientBuilder};
pub use error::{Error, Result};
pub use features::{EnterpriseOptions, IpOptions, VirtualDatacenterOptions, VolumeOptions};
pub use link::{LinkSet, MissingLink, RestLink};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Re-export of the HTTP primitives used in this crate's public API.
pub use reqwest::{Method, StatusCode, Url};
