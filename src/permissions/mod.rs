/*!
 * Permissions Module
 * Entity permission records, grant merging, consolidation, and access evaluation
 *
 * This module is the single source of truth for entity access decisions:
 * which groups may perform which kinds of access on which entities, and
 * whether a given user's group memberships cover a requested permission set.
 *
 * ## Features
 * - Bitmask permission kinds with named flags
 * - Idempotent grant merging (re-granting is always safe)
 * - Read-triggered healing of duplicate records created by write races
 * - Additive-across-groups access evaluation, fail-closed by default
 * - Audit trail of access decisions
 *
 * ## Usage
 * ```ignore
 * use entity_acl::permissions::{PermissionKind, PermissionManager};
 *
 * let manager = PermissionManager::new(store, directory);
 * manager.add_permission(entity, &group, PermissionKind::VIEW | PermissionKind::EDIT)?;
 *
 * if manager.allows_access_type(entity, &user, PermissionKind::EDIT)? {
 *     // Perform operation
 * }
 * ```
 */

pub mod audit;
pub mod consolidate;
pub mod evaluate;
pub mod manager;
pub mod merge;
pub mod pending;
pub mod types;

// Re-export commonly used items
pub use audit::{AuditEvent, AuditLogger, AuditSeverity, AuditStats};
pub use consolidate::Consolidator;
pub use evaluate::AccessEvaluator;
pub use manager::PermissionManager;
pub use merge::{merge_grant, MergeOutcome};
pub use pending::{PendingStats, PendingWrites};
pub use types::{
    AccessChecker, AccessDecision, AccessRequest, EntityPermissionRecord, GroupGrant,
    PermissionError, PermissionKind, PermissionResult, RecordProvider,
};
