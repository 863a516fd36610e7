/*!
 * In-Memory Record Store
 * Reference implementation of the record store contract
 */

use super::traits::{RecordStore, StoreError, StoreResult, WriteScope};
use crate::core::types::{EntityId, StorageKey};
use crate::permissions::types::EntityPermissionRecord;
use ahash::RandomState;
use log::{debug, warn};
use parking_lot::{RwLock, RwLockWriteGuard};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

/// Record table plus entity index, guarded as one unit
#[derive(Default)]
struct Tables {
    records: BTreeMap<StorageKey, EntityPermissionRecord>,
    by_entity: HashMap<EntityId, BTreeSet<StorageKey>, RandomState>,
}

impl Tables {
    fn index(&mut self, key: StorageKey, entity: EntityId) {
        self.by_entity.entry(entity).or_default().insert(key);
    }

    fn unindex(&mut self, key: StorageKey, entity: EntityId) {
        if let Some(keys) = self.by_entity.get_mut(&entity) {
            keys.remove(&key);
            if keys.is_empty() {
                self.by_entity.remove(&entity);
            }
        }
    }

    fn put(&mut self, record: EntityPermissionRecord) -> StoreResult<()> {
        let key = record.key.ok_or(StoreError::Unpersisted)?;
        if let Some(previous) = self.records.insert(key, record.clone()) {
            if previous.entity != record.entity {
                self.unindex(key, previous.entity);
            }
        }
        self.index(key, record.entity);
        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> Option<EntityPermissionRecord> {
        let removed = self.records.remove(&key)?;
        self.unindex(key, removed.entity);
        Some(removed)
    }
}

/// In-memory record store.
///
/// Storage keys are assigned monotonically starting at 1; 0 is never issued.
/// The write scope holds the table lock exclusively for its whole lifetime,
/// which is what makes staged operations atomic with respect to every other
/// reader and writer of this store.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    next_key: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_key: AtomicU64::new(1),
        }
    }

    /// Number of records currently stored
    pub fn len(&self) -> usize {
        self.tables.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().records.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn find_by_entity(&self, entity: EntityId) -> Vec<EntityPermissionRecord> {
        let tables = self.tables.read();
        match tables.by_entity.get(&entity) {
            // BTreeSet iteration gives ascending storage keys
            Some(keys) => keys
                .iter()
                .filter_map(|key| tables.records.get(key).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    fn find_by_key(&self, key: StorageKey) -> Option<EntityPermissionRecord> {
        self.tables.read().records.get(&key).cloned()
    }

    fn insert(&self, mut record: EntityPermissionRecord) -> StoreResult<EntityPermissionRecord> {
        let key = self.next_key.fetch_add(1, Ordering::Relaxed);
        record.key = Some(key);

        let mut tables = self.tables.write();
        tables.put(record.clone())?;
        debug!("inserted permission record {} for entity {}", key, record.entity);
        Ok(record)
    }

    fn update(&self, record: &EntityPermissionRecord) -> StoreResult<()> {
        let key = record.key.ok_or(StoreError::Unpersisted)?;

        let mut tables = self.tables.write();
        if !tables.records.contains_key(&key) {
            return Err(StoreError::NotFound { key });
        }
        tables.put(record.clone())
    }

    fn delete(&self, key: StorageKey) -> StoreResult<()> {
        let mut tables = self.tables.write();
        match tables.remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound { key }),
        }
    }

    fn write_scope(&self) -> Box<dyn WriteScope + '_> {
        Box::new(MemoryWriteScope {
            tables: self.tables.write(),
            staged: Vec::new(),
        })
    }
}

/// A staged store mutation
enum ScopeOp {
    Update(EntityPermissionRecord),
    Delete(StorageKey),
}

/// Write scope over a [`MemoryStore`].
///
/// Holds the table write lock for its whole lifetime and stages operations,
/// applying them only at commit. Dropping the scope without committing
/// discards the staged operations and releases the lock.
struct MemoryWriteScope<'a> {
    tables: RwLockWriteGuard<'a, Tables>,
    staged: Vec<ScopeOp>,
}

impl WriteScope for MemoryWriteScope<'_> {
    fn find_by_key(&self, key: StorageKey) -> Option<EntityPermissionRecord> {
        // Staged operations shadow the base table, latest first
        for op in self.staged.iter().rev() {
            match op {
                ScopeOp::Update(record) if record.key == Some(key) => return Some(record.clone()),
                ScopeOp::Delete(deleted) if *deleted == key => return None,
                _ => {}
            }
        }
        self.tables.records.get(&key).cloned()
    }

    fn update(&mut self, record: &EntityPermissionRecord) -> StoreResult<()> {
        if record.key.is_none() {
            return Err(StoreError::Unpersisted);
        }
        self.staged.push(ScopeOp::Update(record.clone()));
        Ok(())
    }

    fn delete(&mut self, key: StorageKey) {
        self.staged.push(ScopeOp::Delete(key));
    }

    fn commit(mut self: Box<Self>) -> StoreResult<()> {
        let staged = std::mem::take(&mut self.staged);
        for op in staged {
            match op {
                ScopeOp::Update(record) => self.tables.put(record)?,
                ScopeOp::Delete(key) => {
                    // Deleting an already-deleted record is a no-op
                    if self.tables.remove(key).is_none() {
                        debug!("write scope delete of missing record {}, skipping", key);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Drop for MemoryWriteScope<'_> {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            warn!(
                "write scope dropped with {} uncommitted operations, discarding",
                self.staged.len()
            );
        }
    }
}
