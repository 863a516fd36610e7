/*!
 * Record Consolidation
 * Read-triggered healing of duplicate permission records
 */

use super::merge::fold_record;
use super::types::{EntityPermissionRecord, PermissionError, PermissionResult};
use crate::core::types::EntityId;
use crate::storage::{RecordStore, StoreError, WriteScope};
use log::{debug, info};
use std::sync::Arc;

/// Heals the at-most-one-record-per-entity invariant.
///
/// The store enforces no uniqueness across entity identifiers, so two
/// concurrent first-grants can persist two records for the same entity. This
/// engine detects that on read, folds every duplicate's grants into the
/// canonical record inside a single atomic write scope, and deletes the
/// duplicates. The next read after a duplicate-causing race repairs the
/// store; writers never lock proactively.
///
/// Safe to run repeatedly and concurrently: merging is idempotent, and a
/// duplicate that vanished because another run got to it first is absorbed
/// as a benign conflict.
#[derive(Clone)]
pub struct Consolidator {
    store: Arc<dyn RecordStore>,
}

impl Consolidator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The canonical record for an entity, healing duplicates if needed.
    ///
    /// Returns `None` when the entity has no record at all.
    pub fn canonical(&self, entity: EntityId) -> PermissionResult<Option<EntityPermissionRecord>> {
        let mut found = self.store.find_by_entity(entity);
        match found.len() {
            0 => Ok(None),
            1 => Ok(Some(found.remove(0))),
            _ => self.heal(entity, found).map(Some),
        }
    }

    /// Merge duplicates into the lowest-key record and delete the rest.
    ///
    /// Lowest storage key is a policy choice: `find_by_entity` returns
    /// ascending keys, so repeated runs (even interleaved ones) always pick
    /// the same survivor.
    fn heal(
        &self,
        entity: EntityId,
        mut found: Vec<EntityPermissionRecord>,
    ) -> PermissionResult<EntityPermissionRecord> {
        let duplicates = found.split_off(1);
        let mut canonical = found.remove(0);

        // All-or-nothing: a partial merge would silently drop grants if a
        // duplicate were deleted before its grants were folded in.
        let mut scope = self.store.write_scope();
        let mut merged = 0usize;
        let mut vanished = 0usize;

        for duplicate in &duplicates {
            match Self::fold_duplicate(&mut canonical, duplicate, scope.as_mut()) {
                Ok(()) => merged += 1,
                Err(PermissionError::ConsolidationConflict { reason }) => {
                    // Another consolidation run won the race; the surviving
                    // path still reaches one canonical record.
                    debug!("consolidation conflict for entity {}: {}", entity, reason);
                    vanished += 1;
                }
                Err(err) => return Err(err),
            }
        }

        scope.update(&canonical)?;
        scope.commit()?;

        info!(
            "consolidated {} duplicate permission record(s) for entity {} ({} removed elsewhere)",
            merged, entity, vanished
        );
        Ok(canonical)
    }

    /// Fold one duplicate's grants into the canonical record and stage its
    /// deletion.
    fn fold_duplicate(
        canonical: &mut EntityPermissionRecord,
        duplicate: &EntityPermissionRecord,
        scope: &mut dyn WriteScope,
    ) -> PermissionResult<()> {
        let key = duplicate.key.ok_or(StoreError::Unpersisted)?;

        // Re-read through the scope: the duplicate may have been removed
        // since detection.
        let Some(current) = scope.find_by_key(key) else {
            return Err(PermissionError::ConsolidationConflict {
                reason: format!("record {} vanished before its grants were folded", key),
            });
        };

        fold_record(canonical, &current);
        scope.delete(key);
        Ok(())
    }
}
