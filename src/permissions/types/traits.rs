/*!
 * Permission Traits
 * Interfaces for access checking and record retrieval
 */

use super::core::{AccessDecision, EntityPermissionRecord, PermissionKind, PermissionResult};
use crate::core::types::EntityId;
use crate::groups::User;

/// Core access checking interface
pub trait AccessChecker: Send + Sync {
    /// Evaluate whether a user may perform the requested kinds of access
    fn check(
        &self,
        user: &User,
        entity: EntityId,
        kinds: PermissionKind,
    ) -> PermissionResult<AccessDecision>;

    /// Check and record the decision in the audit trail
    fn check_and_audit(
        &self,
        user: &User,
        entity: EntityId,
        kinds: PermissionKind,
    ) -> PermissionResult<AccessDecision>;

    /// Boolean shorthand for [`AccessChecker::check`].
    ///
    /// Never fails for a missing record or missing grant; those deny.
    fn allows(
        &self,
        user: &User,
        entity: EntityId,
        kinds: PermissionKind,
    ) -> PermissionResult<bool> {
        Ok(self.check(user, entity, kinds)?.is_allowed())
    }

    /// Check several entity/kind pairs for one user.
    ///
    /// Per-item isolation: each element gets its own result and a failing
    /// element does not stop the rest.
    fn check_batch(
        &self,
        user: &User,
        requests: &[(EntityId, PermissionKind)],
    ) -> Vec<PermissionResult<AccessDecision>> {
        requests
            .iter()
            .map(|(entity, kinds)| self.check(user, *entity, *kinds))
            .collect()
    }
}

/// Record retrieval interface, duplicate-healing included
pub trait RecordProvider: Send + Sync {
    /// The canonical permission record for an entity, if any exists.
    ///
    /// A read that observes duplicate records heals them before returning.
    fn get_for_entity(&self, entity: EntityId)
        -> PermissionResult<Option<EntityPermissionRecord>>;
}
