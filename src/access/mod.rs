//! Access decisions between a caller dealership and a target dealership.
//!
//! A dealership may act on itself and on anything below it in the tree, never
//! on its parent, its ancestors or its siblings.

use std::future::Future;
use thiserror::Error;

use crate::context::CallerContext;
use crate::hierarchy::HierarchyResolver;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dealership '{caller}' may not access dealership '{target}'")]
pub struct AccessDenied {
    pub caller: String,
    pub target: String,
}

#[derive(Clone)]
pub struct AccessValidator {
    resolver: HierarchyResolver,
}

impl AccessValidator {
    pub fn new(resolver: HierarchyResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &HierarchyResolver {
        &self.resolver
    }

    /// Self-access, or `target` lies in the subtree rooted at `caller`.
    pub async fn validate_access(&self, caller_id: &str, target_id: &str) -> bool {
        tracing::debug!(
            "Validating access for dealership ID: {} to target dealership ID: {}",
            caller_id,
            target_id
        );

        if caller_id == target_id {
            return true;
        }

        let has_access = self.resolver.descendants_of(caller_id).await.contains(target_id);
        tracing::debug!("Access validation result: {}", has_access);
        has_access
    }

    /// Like [`validate_access`](Self::validate_access) but turns a denial into an error.
    pub async fn require_access(&self, caller: &CallerContext, target_id: &str) -> Result<(), AccessDenied> {
        if self.validate_access(caller.dealership_id(), target_id).await {
            Ok(())
        } else {
            tracing::warn!(
                "Denied dealership {} access to dealership {}",
                caller.dealership_id(),
                target_id
            );
            Err(AccessDenied {
                caller: caller.dealership_id().to_string(),
                target: target_id.to_string(),
            })
        }
    }

    /// The dealership an operation runs against: the caller's own when no
    /// target was requested, otherwise the requested one once access is granted.
    pub async fn effective_dealership(
        &self,
        caller: &CallerContext,
        requested: Option<&str>,
    ) -> Result<String, AccessDenied> {
        match requested {
            None => Ok(caller.dealership_id().to_string()),
            Some(target) => {
                self.require_access(caller, target).await?;
                Ok(target.to_string())
            }
        }
    }

    /// Resolve the effective dealership and run `operation` against it.
    /// A denial short-circuits before `operation` is invoked.
    pub async fn scoped<T, E, F, Fut>(
        &self,
        caller: &CallerContext,
        requested: Option<&str>,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<AccessDenied>,
    {
        let dealership_id = self.effective_dealership(caller, requested).await?;
        operation(dealership_id).await
    }
}
