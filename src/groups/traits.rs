/*!
 * Group Traits
 * Interfaces the permission core consumes for group resolution
 */

use super::types::{SecurityGroup, User};
use crate::core::types::GroupId;
use ahash::AHashSet;

/// Group resolution seam consumed by the permission core.
///
/// Implementations own how membership is computed; the core only requires
/// that a user's applicable set contains its direct groups plus the groups
/// reachable through its assigned roles.
pub trait GroupProvider: Send + Sync {
    /// Fetch the authoritative registered instance for a group identifier
    fn resolve_group(&self, id: GroupId) -> Option<SecurityGroup>;

    /// A user's applicable group set: direct groups plus role-conferred groups
    fn applicable_groups(&self, user: &User) -> AHashSet<GroupId>;
}
