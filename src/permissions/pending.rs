/*!
 * Pending Write Cache
 * Per-unit-of-work map of entity id to in-flight permission record
 */

use super::types::EntityPermissionRecord;
use crate::core::limits::PENDING_WRITES_SOFT_LIMIT;
use crate::core::types::EntityId;
use ahash::RandomState;
use log::warn;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Records created during one write sequence whose visibility to a fresh
/// store query is not yet guaranteed.
///
/// A second grant to the same entity inside the sequence reuses the cached
/// record instead of inserting a duplicate. This narrows the duplicate-insert
/// race window; it is NOT a substitute for store-level uniqueness, and reads
/// of access decisions never consult it.
///
/// # Scope
/// One cache belongs to one logical unit of work (in practice: one
/// [`PermissionManager`](crate::permissions::PermissionManager) instance).
/// The interior mutex makes concurrent access memory-safe, but sharing one
/// cache across unrelated concurrent operations widens its scope beyond a
/// unit of work and leaks in-flight records between them; give unrelated
/// operations their own manager instead.
pub struct PendingWrites {
    entries: Mutex<HashMap<EntityId, EntityPermissionRecord, RandomState>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PendingWrites {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::with_hasher(RandomState::new())),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The in-flight record for an entity, if one exists
    pub fn get(&self, entity: EntityId) -> Option<EntityPermissionRecord> {
        let found = self.entries.lock().get(&entity).cloned();
        match found {
            Some(record) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(record)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Remember an in-flight record, overwriting any previous entry
    pub fn put(&self, entity: EntityId, record: EntityPermissionRecord) {
        let mut entries = self.entries.lock();
        entries.insert(entity, record);
        if entries.len() > PENDING_WRITES_SOFT_LIMIT {
            warn!(
                "pending write cache holds {} entries; this manager is likely shared across unrelated operations",
                entries.len()
            );
        }
    }

    /// Drop the entry for an entity
    pub fn remove(&self, entity: EntityId) {
        self.entries.lock().remove(&entity);
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> PendingStats {
        PendingStats {
            size: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for PendingWrites {
    fn default() -> Self {
        Self::new()
    }
}

/// Pending write cache statistics
#[derive(Debug, Clone)]
pub struct PendingStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
}
