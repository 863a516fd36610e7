/*!
 * Entity ACL Library
 * Entity permission store with group grants and bitmask access evaluation
 *
 * Grants and denies access to arbitrary addressable entities based on group
 * membership and a bitmask of permission kinds. The store tolerates
 * concurrent, non-coordinating writers: duplicate records created by
 * first-grant races are healed lazily by the next consolidating read.
 *
 * ## Usage
 * ```ignore
 * use entity_acl::groups::{GroupDirectory, User};
 * use entity_acl::permissions::{PermissionKind, PermissionManager};
 * use entity_acl::storage::MemoryStore;
 * use entity_acl::EntityId;
 * use std::sync::Arc;
 *
 * let directory = Arc::new(GroupDirectory::new());
 * let editors = directory.group_if_not_exists("editors", "Content editors");
 * let manager = PermissionManager::new(Arc::new(MemoryStore::new()), directory.clone());
 *
 * let document = EntityId::new();
 * manager.add_permission(document, &editors, PermissionKind::VIEW | PermissionKind::EDIT)?;
 *
 * let user = User::new("alice").with_group(editors.guid);
 * assert!(manager.allows_access_type(document, &user, PermissionKind::VIEW)?);
 * ```
 */

pub mod core;
pub mod groups;
pub mod permissions;
pub mod storage;

// Re-exports
pub use crate::core::errors::AclError;
pub use crate::core::types::{AclResult, EntityId, GroupId, RoleId, StorageKey, UserId};
pub use groups::{GroupDirectory, GroupProvider, Role, SecurityGroup, User};
pub use permissions::{
    AccessChecker, AccessDecision, AccessRequest, EntityPermissionRecord, GroupGrant,
    PermissionError, PermissionKind, PermissionManager, PermissionResult,
};
pub use storage::{MemoryStore, RecordStore, StoreError, StoreResult, WriteScope};
