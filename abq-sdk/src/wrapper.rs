//! Shared state of every domain wrapper.

use abq_api::RestLink;
use abq_api::types::Resource;
use tracing::info;

use crate::context::AbiquoContext;
use crate::error::{Error, Result};

/// A transfer object together with the context used to operate on it.
///
/// The target is cleared once the entity is deleted; from then on every
/// accessor fails with [`Error::Deleted`].
#[derive(Debug, Clone)]
pub struct DomainWrapper<T: Resource> {
    ctx: AbiquoContext,
    target: Option<T>,
}

impl<T: Resource> DomainWrapper<T> {
    pub(crate) fn new(ctx: AbiquoContext, target: T) -> Self {
        Self {
            ctx,
            target: Some(target),
        }
    }

    pub fn context(&self) -> &AbiquoContext {
        &self.ctx
    }

    /// The wrapped transfer object.
    pub fn target(&self) -> Result<&T> {
        self.target.as_ref().ok_or(Error::Deleted { kind: T::KIND })
    }

    pub(crate) fn target_mut(&mut self) -> Result<&mut T> {
        self.target.as_mut().ok_or(Error::Deleted { kind: T::KIND })
    }

    /// A copy of the wrapped transfer object.
    pub fn unwrap(&self) -> Result<T> {
        self.target().cloned()
    }

    pub fn is_deleted(&self) -> bool {
        self.target.is_none()
    }

    /// Whether the entity exists on the server.
    pub fn is_persisted(&self) -> bool {
        self.target.as_ref().is_some_and(|t| t.is_persisted())
    }

    pub fn link(&self, rel: &str) -> Result<&RestLink> {
        Ok(self.target()?.link(rel)?)
    }

    pub fn id_from_link(&self, rel: &str) -> Result<i32> {
        Ok(self.target()?.id_from_link(rel)?)
    }

    /// Replace the local state with a server representation.
    pub(crate) fn replace(&mut self, target: T) {
        self.target = Some(target);
    }

    /// Drop the local state after the server removed the entity.
    pub(crate) fn mark_deleted(&mut self) {
        self.target = None;
    }

    /// Fail unless the entity is persisted and usable as a parent.
    pub(crate) fn require_persisted(&self) -> Result<&T> {
        let target = self.target()?;
        if !target.is_persisted() {
            return Err(Error::validation(format!(
                "{} must be saved before it can be used as a parent",
                T::KIND
            )));
        }
        Ok(target)
    }

    /// PUT the current state to the `edit` link and keep the answer.
    pub(crate) async fn update(&mut self) -> Result<()> {
        let target = self.target()?;
        target.edit_link()?;
        let updated = self.ctx.api().update_resource(target).await?;
        self.target = Some(updated);
        Ok(())
    }

    /// DELETE the entity through its `edit` link and clear the target.
    pub(crate) async fn delete(&mut self) -> Result<()> {
        let target = self.target()?;
        let href = target.edit_link()?.href.clone();
        self.ctx.api().delete_resource(target).await?;
        self.target = None;
        info!(kind = T::KIND, %href, "deleted");
        Ok(())
    }
}

/// Keep the items matching `predicate`.
pub(crate) fn filter<T>(items: Vec<T>, predicate: impl Fn(&T) -> bool) -> Vec<T> {
    items.into_iter().filter(|item| predicate(item)).collect()
}

/// First item matching `predicate`.
pub(crate) fn find_first<T>(items: Vec<T>, predicate: impl Fn(&T) -> bool) -> Option<T> {
    items.into_iter().find(|item| predicate(item))
}

/// Generates the accessors every domain wrapper shares, delegating to its
/// `inner` [`DomainWrapper`].
macro_rules! wrapper {
    ($name:ident, $dto:ty) => {
        impl $name {
            /// Wrap a transfer object obtained from the API.
            pub fn wrap(ctx: &$crate::context::AbiquoContext, dto: $dto) -> Self {
                Self::from_inner($crate::wrapper::DomainWrapper::new(ctx.clone(), dto))
            }

            pub fn context(&self) -> &$crate::context::AbiquoContext {
                self.inner.context()
            }

            /// The wrapped transfer object.
            pub fn target(&self) -> $crate::error::Result<&$dto> {
                self.inner.target()
            }

            /// A copy of the wrapped transfer object.
            pub fn unwrap(&self) -> $crate::error::Result<$dto> {
                self.inner.unwrap()
            }

            pub fn is_persisted(&self) -> bool {
                self.inner.is_persisted()
            }

            pub fn is_deleted(&self) -> bool {
                self.inner.is_deleted()
            }

            pub fn link(&self, rel: &str) -> $crate::error::Result<&abq_api::RestLink> {
                self.inner.link(rel)
            }
        }
    };
}

pub(crate) use wrapper;

/// Map a `Vec` of transfer objects into wrappers.
pub(crate) fn wrap_all<T, W>(
    ctx: &AbiquoContext,
    dtos: Vec<T>,
    wrap: fn(&AbiquoContext, T) -> W,
) -> Vec<W> {
    dtos.into_iter().map(|dto| wrap(ctx, dto)).collect()
}
