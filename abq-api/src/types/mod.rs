//! XML transfer objects exchanged with the Abiquo API.
//!
//! Element and field names follow the server's published media types. Every
//! entity embeds its [`LinkSet`] as leading `<link/>` elements.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::link::{LinkSet, MissingLink, RestLink, rel};

/// An entity that carries hypermedia links.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human readable entity name used in diagnostics.
    const KIND: &'static str;

    fn links(&self) -> &LinkSet;

    fn links_mut(&mut self) -> &mut LinkSet;

    /// An entity is persisted iff the server gave it an `edit` link.
    fn is_persisted(&self) -> bool {
        self.links().contains(rel::EDIT)
    }

    fn edit_link(&self) -> Result<&RestLink, MissingLink> {
        self.links().require(rel::EDIT)
    }

    fn link(&self, rel: &str) -> Result<&RestLink, MissingLink> {
        self.links().require(rel)
    }

    fn id_from_link(&self, rel: &str) -> Result<i32, MissingLink> {
        self.links().id_from_link(rel)
    }
}

/// A list response: items plus the links of the collection itself.
pub trait Collection: DeserializeOwned + Send + 'static {
    type Item: Resource;

    fn into_items(self) -> Vec<Self::Item>;
}

macro_rules! resource {
    ($dto:ty, $kind:literal) => {
        impl $crate::types::Resource for $dto {
            const KIND: &'static str = $kind;

            fn links(&self) -> &$crate::link::LinkSet {
                &self.links
            }

            fn links_mut(&mut self) -> &mut $crate::link::LinkSet {
                &mut self.links
            }
        }
    };
}

macro_rules! collection {
    ($(#[$meta:meta])* $name:ident, $root:literal, $item:literal, $dto:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
        #[serde(rename = $root)]
        pub struct $name {
            #[serde(rename = "link", default, skip_serializing_if = "crate::link::LinkSet::is_empty")]
            pub links: crate::link::LinkSet,
            #[serde(rename = $item, default)]
            pub collection: Vec<$dto>,
        }

        impl $crate::types::Collection for $name {
            type Item = $dto;

            fn into_items(self) -> Vec<$dto> {
                self.collection
            }
        }
    };
}

pub(crate) use collection;
pub(crate) use resource;

mod cloud;
mod enterprise;
mod infrastructure;
mod network;
mod task;

pub use cloud::*;
pub use enterprise::*;
pub use infrastructure::*;
pub use network::*;
pub use task::*;

/// Payload of link-reference operations: `<links><link .../></links>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "links")]
pub struct LinksDto {
    #[serde(rename = "link", default, skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
}

impl LinksDto {
    pub fn new(links: impl IntoIterator<Item = RestLink>) -> Self {
        Self {
            links: links.into_iter().collect(),
        }
    }
}

/// One entry of an `<errors>` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "error")]
pub struct ErrorDto {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename = "errors")]
pub struct ErrorsDto {
    #[serde(rename = "error", default)]
    pub collection: Vec<ErrorDto>,
}
