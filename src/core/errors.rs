/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

// Re-export PermissionError from the permissions module
pub use crate::permissions::types::PermissionError;

// Re-export StoreError from the storage module
pub use crate::storage::StoreError;

/// Unified crate error type with miette diagnostics
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum AclError {
    #[error("Permission error: {0}")]
    #[diagnostic(
        code(acl::permission_error),
        help("Check the entity identifier and that referenced groups are registered.")
    )]
    Permission(#[from] PermissionError),

    #[error("Store error: {0}")]
    #[diagnostic(
        code(acl::store_error),
        help("The backing record store rejected the operation. Check record keys and store state.")
    )]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    #[diagnostic(code(acl::internal_error), help("This is a bug. Please report it."))]
    Internal(String),
}
