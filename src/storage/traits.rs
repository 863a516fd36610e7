/*!
 * Storage Contracts
 * Interfaces the permission core consumes from its persistence collaborator
 */

use crate::core::types::{EntityId, StorageKey};
use crate::permissions::types::EntityPermissionRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "error")]
pub enum StoreError {
    #[error("no record with storage key {key}")]
    NotFound { key: StorageKey },

    #[error("record has no storage key; it was never inserted")]
    Unpersisted,
}

/// Durable table of entity permission records.
///
/// The store enforces no uniqueness across entity identifiers: concurrent
/// first-grant writers may legitimately persist more than one record for the
/// same entity. Consumers must tolerate `find_by_entity` returning several
/// records and heal duplicates themselves (see
/// [`Consolidator`](crate::permissions::consolidate::Consolidator)).
pub trait RecordStore: Send + Sync {
    /// All records whose entity identifier matches, ascending by storage key.
    ///
    /// Ascending key order is load-bearing: consolidation designates the
    /// lowest-key record canonical, and a stable order makes that choice
    /// deterministic across repeated runs.
    fn find_by_entity(&self, entity: EntityId) -> Vec<EntityPermissionRecord>;

    /// Look up a single record by its storage key
    fn find_by_key(&self, key: StorageKey) -> Option<EntityPermissionRecord>;

    /// Insert a record, assigning it a fresh storage key.
    ///
    /// Returns the stored copy with the key set. Any key already present on
    /// the argument is ignored and replaced.
    fn insert(&self, record: EntityPermissionRecord) -> StoreResult<EntityPermissionRecord>;

    /// Write back a previously inserted record
    fn update(&self, record: &EntityPermissionRecord) -> StoreResult<()>;

    /// Insert-or-update depending on whether the record carries a key
    fn upsert(&self, record: EntityPermissionRecord) -> StoreResult<EntityPermissionRecord> {
        if record.is_persisted() {
            self.update(&record)?;
            Ok(record)
        } else {
            self.insert(record)
        }
    }

    /// Delete the record with the given storage key
    fn delete(&self, key: StorageKey) -> StoreResult<()>;

    /// Open an atomic write scope.
    ///
    /// Operations staged through the scope apply all-or-nothing at
    /// [`WriteScope::commit`]; a scope dropped without commit discards every
    /// staged operation. Implementations must guarantee release of any held
    /// resources on all exit paths.
    fn write_scope(&self) -> Box<dyn WriteScope + '_>;
}

/// Atomic write scope over a [`RecordStore`].
///
/// Reads through the scope observe staged writes. Staged deletes of records
/// that no longer exist at commit are no-ops, not failures: a duplicate
/// removed by a concurrent consolidation run must not poison this one.
pub trait WriteScope {
    /// Look up a record, staged writes included
    fn find_by_key(&self, key: StorageKey) -> Option<EntityPermissionRecord>;

    /// Stage a write-back of a previously inserted record
    fn update(&mut self, record: &EntityPermissionRecord) -> StoreResult<()>;

    /// Stage a delete
    fn delete(&mut self, key: StorageKey);

    /// Apply every staged operation atomically
    fn commit(self: Box<Self>) -> StoreResult<()>;
}
