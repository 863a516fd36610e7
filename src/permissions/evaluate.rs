/*!
 * Access Evaluation
 * Decides whether a user's aggregate group grants satisfy a request
 */

use super::types::{AccessDecision, AccessRequest, EntityPermissionRecord, PermissionKind};
use crate::core::types::GroupId;
use ahash::AHashSet;
use log::debug;

/// Evaluates access requests against a canonical permission record.
///
/// Grants accumulate additively across all of a user's applicable groups —
/// a user gaining a second group can only gain access. A request succeeds
/// only when the union of those grants covers every requested bit; partial
/// coverage denies the whole request. No record means nothing is permitted
/// (fail closed).
pub struct AccessEvaluator;

impl AccessEvaluator {
    /// The union of the record's grants visible to the applicable group set
    pub fn effective_kinds(
        record: &EntityPermissionRecord,
        applicable: &AHashSet<GroupId>,
    ) -> PermissionKind {
        record
            .grants
            .iter()
            .filter(|grant| applicable.contains(&grant.group))
            .fold(PermissionKind::empty(), |acc, grant| acc | grant.kinds)
    }

    /// Evaluate a request, producing a reasoned decision
    pub fn evaluate(
        request: AccessRequest,
        record: Option<&EntityPermissionRecord>,
        applicable: &AHashSet<GroupId>,
    ) -> AccessDecision {
        let Some(record) = record else {
            debug!(
                "denying {} on entity {}: no permission record",
                request.kinds, request.entity
            );
            return AccessDecision::deny(request, "no permission record for entity");
        };

        let effective = Self::effective_kinds(record, applicable);
        if effective.covers(request.kinds) {
            let reason = format!("requested {} covered by effective {}", request.kinds, effective);
            AccessDecision::allow(request, reason)
        } else {
            let reason = format!(
                "effective grants {} do not cover requested {}",
                effective, request.kinds
            );
            debug!(
                "denying {} on entity {} for user {}: {}",
                request.kinds, request.entity, request.user, reason
            );
            AccessDecision::deny(request, reason)
        }
    }
}
