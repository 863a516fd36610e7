/*!
 * Permission Manager
 * Caller-facing facade over the store, group directory, and consolidation
 */

use super::audit::{AuditEvent, AuditLogger, AuditStats};
use super::consolidate::Consolidator;
use super::evaluate::AccessEvaluator;
use super::merge::{fold_record, merge_grant};
use super::pending::{PendingStats, PendingWrites};
use super::types::{
    AccessChecker, AccessDecision, AccessRequest, EntityPermissionRecord, PermissionError,
    PermissionKind, PermissionResult, RecordProvider,
};
use crate::core::types::{EntityId, GroupId};
use crate::groups::{GroupProvider, SecurityGroup, User};
use crate::storage::RecordStore;
use log::debug;
use std::sync::Arc;

/// Central manager for entity permissions.
///
/// Wires the record store, group provider, pending-write cache, duplicate
/// consolidation, and audit trail behind the operations callers use:
/// granting, whole-record add/update, and access checks.
///
/// Cloning shares all internal state, including the pending-write cache —
/// clones belong to the same logical unit of work. Unrelated concurrent
/// operations should construct their own manager over the same store.
#[derive(Clone)]
pub struct PermissionManager {
    store: Arc<dyn RecordStore>,
    groups: Arc<dyn GroupProvider>,
    consolidator: Consolidator,
    pending: Arc<PendingWrites>,
    audit: Arc<AuditLogger>,
}

impl PermissionManager {
    /// Create a new permission manager
    pub fn new(store: Arc<dyn RecordStore>, groups: Arc<dyn GroupProvider>) -> Self {
        debug!("initializing permission manager");
        Self {
            consolidator: Consolidator::new(store.clone()),
            store,
            groups,
            pending: Arc::new(PendingWrites::new()),
            audit: Arc::new(AuditLogger::new()),
        }
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Get audit statistics
    pub fn audit_stats(&self) -> AuditStats {
        self.audit.stats()
    }

    /// Get pending-write cache statistics
    pub fn pending_stats(&self) -> PendingStats {
        self.pending.stats()
    }

    /// Grant the specified permission kinds on an entity to a security group.
    ///
    /// The group is resolved to its registered instance first; grants never
    /// reference a caller-supplied transient copy. Re-granting the same
    /// kinds is idempotent.
    pub fn add_permission(
        &self,
        entity: EntityId,
        group: &SecurityGroup,
        kinds: PermissionKind,
    ) -> PermissionResult<()> {
        self.add_permission_by_id(entity, group.guid, kinds)
    }

    fn add_permission_by_id(
        &self,
        entity: EntityId,
        group: GroupId,
        kinds: PermissionKind,
    ) -> PermissionResult<()> {
        if group.is_nil() {
            return Err(PermissionError::InvalidArgument {
                reason: "security group reference is nil".into(),
            });
        }

        let canonical_group =
            self.groups
                .resolve_group(group)
                .ok_or_else(|| PermissionError::NotFound {
                    reason: format!("security group {} is not registered", group),
                })?;

        // Store first; the pending cache only covers records whose
        // visibility to a fresh query is not yet guaranteed.
        let existing = match self.consolidator.canonical(entity)? {
            Some(record) => Some(record),
            None => self.pending.get(entity),
        };

        match existing {
            None => {
                if entity.is_nil() {
                    return Err(PermissionError::InvalidState {
                        reason: "cannot add permissions with empty identifier".into(),
                    });
                }

                let mut record = EntityPermissionRecord::new(entity);
                merge_grant(&mut record, canonical_group.guid, kinds);
                let stored = self.store.insert(record)?;
                self.pending.put(entity, stored);
            }
            Some(mut record) => {
                merge_grant(&mut record, canonical_group.guid, kinds);
                let stored = self.store.upsert(record)?;
                self.pending.put(entity, stored);
            }
        }

        debug!("granted {} on entity {} to group '{}'", kinds, entity, canonical_group.name);
        Ok(())
    }

    /// Add a whole set of permissions as a new or existing record.
    ///
    /// If no record exists for the entity, the incoming record is inserted
    /// as a fresh row; otherwise each of its grants is folded into the
    /// existing record.
    pub fn add(&self, record: &EntityPermissionRecord) -> PermissionResult<()> {
        if record.entity.is_nil() {
            return Err(PermissionError::InvalidState {
                reason: "cannot add permissions with empty identifier".into(),
            });
        }

        match self.get_for_entity(record.entity)? {
            None => {
                let stored = self.store.insert(Self::normalized(record))?;
                self.pending.put(record.entity, stored);
                Ok(())
            }
            Some(_) => {
                for grant in &record.grants {
                    self.add_permission_by_id(record.entity, grant.group, grant.kinds)?;
                }
                Ok(())
            }
        }
    }

    /// A fresh, unkeyed copy of a caller-supplied record with duplicate
    /// group entries merged by OR
    fn normalized(record: &EntityPermissionRecord) -> EntityPermissionRecord {
        let mut fresh = EntityPermissionRecord::new(record.entity);
        fold_record(&mut fresh, record);
        fresh
    }

    /// Replace an entity's permissions, or add them if they are new.
    ///
    /// Unlike [`PermissionManager::add`], an existing record's grant list is
    /// replaced wholesale rather than merged.
    pub fn update(&self, record: &EntityPermissionRecord) -> PermissionResult<()> {
        if record.entity.is_nil() {
            return Err(PermissionError::InvalidState {
                reason: "cannot update permissions with empty identifier".into(),
            });
        }

        match self.get_for_entity(record.entity)? {
            None => {
                let stored = self.store.insert(Self::normalized(record))?;
                self.pending.put(record.entity, stored);
            }
            Some(mut existing) => {
                existing.grants = Self::normalized(record).grants;
                self.store.update(&existing)?;
                self.pending.put(record.entity, existing);
            }
        }
        Ok(())
    }

    /// Alias of [`PermissionManager::update`]
    pub fn add_or_update(&self, record: &EntityPermissionRecord) -> PermissionResult<()> {
        self.update(record)
    }

    /// Apply [`PermissionManager::add`] to each record in order.
    ///
    /// Fail-fast batch: the first error stops the batch and is returned;
    /// earlier records remain applied.
    pub fn add_range<'a>(
        &self,
        records: impl IntoIterator<Item = &'a EntityPermissionRecord>,
    ) -> PermissionResult<()> {
        for record in records {
            self.add(record)?;
        }
        Ok(())
    }

    /// Apply [`PermissionManager::update`] to each record in order.
    ///
    /// Fail-fast batch: the first error stops the batch and is returned;
    /// earlier records remain applied.
    pub fn update_range<'a>(
        &self,
        records: impl IntoIterator<Item = &'a EntityPermissionRecord>,
    ) -> PermissionResult<()> {
        for record in records {
            self.update(record)?;
        }
        Ok(())
    }

    /// Whether the entity allows the given kinds of access for the user.
    ///
    /// Never fails for a missing record or grant; those deny.
    pub fn allows_access_type(
        &self,
        entity: EntityId,
        user: &User,
        kinds: PermissionKind,
    ) -> PermissionResult<bool> {
        self.allows(user, entity, kinds)
    }
}

impl RecordProvider for PermissionManager {
    fn get_for_entity(
        &self,
        entity: EntityId,
    ) -> PermissionResult<Option<EntityPermissionRecord>> {
        self.consolidator.canonical(entity)
    }
}

impl AccessChecker for PermissionManager {
    fn check(
        &self,
        user: &User,
        entity: EntityId,
        kinds: PermissionKind,
    ) -> PermissionResult<AccessDecision> {
        if user.guid.is_nil() {
            return Err(PermissionError::InvalidArgument {
                reason: "user reference is nil".into(),
            });
        }

        let request = AccessRequest::new(entity, user.guid, kinds);
        let record = self.consolidator.canonical(entity)?;
        let applicable = self.groups.applicable_groups(user);
        Ok(AccessEvaluator::evaluate(request, record.as_ref(), &applicable))
    }

    fn check_and_audit(
        &self,
        user: &User,
        entity: EntityId,
        kinds: PermissionKind,
    ) -> PermissionResult<AccessDecision> {
        let decision = self.check(user, entity, kinds)?;
        self.audit.log(AuditEvent::new(decision.clone()));
        Ok(decision)
    }
}
