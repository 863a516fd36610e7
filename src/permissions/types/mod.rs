/*!
 * Permission Types
 * Core types and traits for entity permission checking
 */

mod core;
mod traits;

pub use core::{
    AccessDecision, AccessRequest, EntityPermissionRecord, GroupGrant, PermissionError,
    PermissionKind, PermissionResult,
};
pub use traits::{AccessChecker, RecordProvider};
