/*!
 * Permission Types
 * Core types for entity permission records and access decisions
 */

use crate::core::types::{EntityId, GroupId, StorageKey, UserId};
use crate::storage::StoreError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use std::time::SystemTime;
use thiserror::Error;

/// Result type for permission operations
pub type PermissionResult<T> = Result<T, PermissionError>;

/// Permission errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "error")]
pub enum PermissionError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("not found: {reason}")]
    NotFound { reason: String },

    /// A duplicate record vanished between detection and deletion.
    ///
    /// Benign: another consolidation run won the race and the surviving path
    /// still reaches the desired end state. Absorbed internally, never
    /// surfaced to access-check callers.
    #[error("consolidation conflict: {reason}")]
    ConsolidationConflict { reason: String },

    #[error("store error: {reason}")]
    Store { reason: String },
}

impl From<StoreError> for PermissionError {
    fn from(err: StoreError) -> Self {
        PermissionError::Store {
            reason: err.to_string(),
        }
    }
}

bitflags! {
    /// Kinds of access that can be granted on an entity.
    ///
    /// Requests and grants are always bitwise-combinable sets of these
    /// flags, never a single scalar. A request is satisfied only when every
    /// requested bit is covered ([`PermissionKind::contains`]); partial
    /// coverage denies the whole request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PermissionKind: u32 {
        const VIEW       = 0b0000_0001;
        const EDIT       = 0b0000_0010;
        const CREATE     = 0b0000_0100;
        const DELETE     = 0b0000_1000;
        const ADMINISTER = 0b0001_0000;
    }
}

impl PermissionKind {
    /// Every permission kind
    pub const FULL: Self = Self::VIEW
        .union(Self::EDIT)
        .union(Self::CREATE)
        .union(Self::DELETE)
        .union(Self::ADMINISTER);

    /// Whether this set covers every bit of `requested`
    #[must_use]
    pub fn covers(self, requested: Self) -> bool {
        self.contains(requested)
    }

    /// Human-readable list of flag names
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::VIEW) {
            names.push("VIEW");
        }
        if self.contains(Self::EDIT) {
            names.push("EDIT");
        }
        if self.contains(Self::CREATE) {
            names.push("CREATE");
        }
        if self.contains(Self::DELETE) {
            names.push("DELETE");
        }
        if self.contains(Self::ADMINISTER) {
            names.push("ADMINISTER");
        }
        names
    }
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

/// What a single group may do to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupGrant {
    pub group: GroupId,
    pub kinds: PermissionKind,
}

/// The full grant table for one entity.
///
/// Holds at most one [`GroupGrant`] per distinct group; duplicate group
/// entries are merged by bitwise OR. Logically at most one record exists per
/// entity identifier; write races can break that physically, and the
/// [`Consolidator`](crate::permissions::consolidate::Consolidator) restores
/// it on the next read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EntityPermissionRecord {
    /// Store-assigned key; `None` until first insert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<StorageKey>,
    /// The protected entity. Never the nil value for a persisted record.
    pub entity: EntityId,
    pub grants: Vec<GroupGrant>,
}

impl EntityPermissionRecord {
    /// Create an empty record for an entity
    pub fn new(entity: EntityId) -> Self {
        Self {
            key: None,
            entity,
            grants: Vec::new(),
        }
    }

    /// The grant for a specific group, if any
    pub fn grant_for(&self, group: GroupId) -> Option<&GroupGrant> {
        self.grants.iter().find(|grant| grant.group == group)
    }

    /// The kinds granted to a specific group (empty if none)
    pub fn kinds_for(&self, group: GroupId) -> PermissionKind {
        self.grant_for(group)
            .map(|grant| grant.kinds)
            .unwrap_or(PermissionKind::empty())
    }

    /// Whether this record has been inserted into a store
    pub fn is_persisted(&self) -> bool {
        self.key.is_some()
    }
}

/// An access check being evaluated
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AccessRequest {
    /// Entity being accessed
    pub entity: EntityId,
    /// User doing the accessing
    pub user: UserId,
    /// Permission kinds needed to perform the action
    pub kinds: PermissionKind,
    /// When the request was made
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub requested_at: SystemTime,
}

impl AccessRequest {
    pub fn new(entity: EntityId, user: UserId, kinds: PermissionKind) -> Self {
        Self {
            entity,
            user,
            kinds,
            requested_at: SystemTime::now(),
        }
    }
}

/// Outcome of an access check
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AccessDecision {
    /// Request that was evaluated
    pub request: AccessRequest,
    /// Whether access is granted
    pub allowed: bool,
    /// Reason for the decision
    pub reason: String,
    /// Decision time
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub decided_at: SystemTime,
}

impl AccessDecision {
    /// Create an allowed decision
    pub fn allow(request: AccessRequest, reason: impl Into<String>) -> Self {
        Self {
            request,
            allowed: true,
            reason: reason.into(),
            decided_at: SystemTime::now(),
        }
    }

    /// Create a denied decision
    pub fn deny(request: AccessRequest, reason: impl Into<String>) -> Self {
        Self {
            request,
            allowed: false,
            reason: reason.into(),
            decided_at: SystemTime::now(),
        }
    }

    /// Check if allowed
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Get reason
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
