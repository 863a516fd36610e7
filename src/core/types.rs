/*!
 * Core Types
 * Identifier newtypes and common aliases used across the crate
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Store-assigned surrogate key for persisted records.
///
/// Keys are assigned monotonically starting at 1; 0 is never issued.
pub type StorageKey = u64;

/// Common result type for crate-level operations
pub type AclResult<T> = Result<T, super::errors::AclError>;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The reserved zero value. Never valid for a persisted record.
            pub const fn nil() -> Self {
                Self(Uuid::nil())
            }

            /// Whether this is the reserved zero value
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id! {
    /// Identifier of a protected entity (any addressable object)
    EntityId
}

uuid_id! {
    /// Identifier of a security group
    GroupId
}

uuid_id! {
    /// Identifier of a role
    RoleId
}

uuid_id! {
    /// Identifier of a user
    UserId
}
