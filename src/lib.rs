//! Rust client SDK for the Abiquo cloud management API.
//!
//! This crate provides two modules:
//!
//! - [`api`]: low-level typed client speaking the XML REST API through links
//! - [`sdk`]: domain wrappers, builders and task monitoring on top of it
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use abiquo::api::VirtualDatacenterOptions;
//! use abiquo::sdk::{ContextBuilder, predicates};
//!
//! # async fn example() -> abiquo::sdk::Result<()> {
//! let ctx = ContextBuilder::from_env()?
//!     .async_task_monitor_delay(Duration::from_secs(2))
//!     .build()?;
//!
//! for vdc in ctx
//!     .cloud()
//!     .list_virtual_datacenters(VirtualDatacenterOptions::default())
//!     .await?
//! {
//!     println!("{:?}", vdc.name()?);
//! }
//!
//! let web = ctx
//!     .cloud()
//!     .find_virtual_machine(predicates::vm::name(["web"]))
//!     .await?;
//! if let Some(vm) = web {
//!     let task = vm.undeploy(false).await?;
//!     ctx.task_monitor()
//!         .await_completion(&task, Duration::from_secs(300))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

/// Low-level typed API client.
///
/// Transfer objects, the link model, the [`Transport`](api::Transport) seam
/// and one async method per endpoint.
pub use abq_api as api;

/// High-level SDK.
///
/// Wrappers that navigate by link, builders that check their parents, and
/// the poller for asynchronous tasks.
pub use abq_sdk as sdk;
