/*!
 * Grant Merging
 * Idempotent fold of group grants into a permission record
 */

use super::types::{EntityPermissionRecord, GroupGrant, PermissionKind};
use crate::core::types::GroupId;

/// What a merge did to the target record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The group had no grant; one was appended
    Added,
    /// The group's existing grant gained at least one new kind
    Widened,
    /// Every requested kind was already granted
    Unchanged,
}

/// Fold a (group, kinds) grant into a record.
///
/// If the record already holds a grant for the group, its bitmask becomes
/// `existing | kinds`; otherwise a new grant is appended. Pure bookkeeping
/// under bitwise OR: associative, commutative, and absorbing, so repeated
/// and reordered merges always converge on the same record. That algebra is
/// what makes duplicate-record consolidation safe to run any number of
/// times without losing information.
pub fn merge_grant(
    record: &mut EntityPermissionRecord,
    group: GroupId,
    kinds: PermissionKind,
) -> MergeOutcome {
    match record.grants.iter_mut().find(|grant| grant.group == group) {
        Some(grant) => {
            let widened = grant.kinds | kinds;
            if widened == grant.kinds {
                MergeOutcome::Unchanged
            } else {
                grant.kinds = widened;
                MergeOutcome::Widened
            }
        }
        None => {
            record.grants.push(GroupGrant { group, kinds });
            MergeOutcome::Added
        }
    }
}

/// Fold every grant of `source` into `target`.
///
/// Returns the number of grants that changed the target.
pub fn fold_record(target: &mut EntityPermissionRecord, source: &EntityPermissionRecord) -> usize {
    source
        .grants
        .iter()
        .filter(|grant| merge_grant(target, grant.group, grant.kinds) != MergeOutcome::Unchanged)
        .count()
}
