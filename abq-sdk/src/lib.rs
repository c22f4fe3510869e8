//! High-level SDK for the Abiquo cloud API.
//!
//! Every entity is a wrapper around the transfer object returned by the
//! server plus the [`AbiquoContext`] used to reach it. Related entities are
//! reached through the links the server embeds, never through hand-built
//! URLs. Operations the server runs asynchronously return an [`AsyncTask`]
//! that a [`TaskMonitor`] can wait on.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use abq_sdk::cloud::VirtualAppliance;
//! use abq_sdk::{AbiquoContext, predicates};
//! use abq_sdk::api::{Credentials, VirtualDatacenterOptions};
//!
//! # async fn example() -> abq_sdk::Result<()> {
//! let ctx = AbiquoContext::builder("http://localhost/api", Credentials::basic("admin", "xabiquo"))
//!     .async_task_monitor_delay(Duration::from_secs(2))
//!     .build()?;
//!
//! let vdc = ctx
//!     .cloud()
//!     .list_virtual_datacenters(VirtualDatacenterOptions::default())
//!     .await?
//!     .into_iter()
//!     .next()
//!     .expect("no virtual datacenter");
//!
//! let mut vapp = VirtualAppliance::builder(&vdc)?.name("web").build();
//! vapp.save().await?;
//!
//! let vm = vapp
//!     .find_virtual_machine(predicates::vm::name(["frontend"]))
//!     .await?
//!     .expect("no such machine");
//! let task = vm.deploy(false).await?;
//! ctx.task_monitor()
//!     .await_completion(&task, Duration::from_secs(600))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod cloud;
pub mod context;
pub mod error;
pub mod fanout;
pub mod infrastructure;
pub mod monitor;
pub mod network;
pub mod predicates;
pub mod service;
pub mod task;
pub mod wrapper;

pub use context::{AbiquoConfig, AbiquoContext, ContextBuilder};
pub use error::{Error, ErrorKind, Result};
pub use fanout::FanOut;
pub use monitor::TaskMonitor;
pub use service::{AdministrationService, CloudService, InfrastructureService, SearchService};
pub use task::{AsyncTask, TaskReference, TaskStatus};
pub use wrapper::DomainWrapper;

/// Re-export of the low-level client crate.
pub use abq_api as api;
