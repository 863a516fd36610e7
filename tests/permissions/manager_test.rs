/*!
 * Permission Manager Integration Tests
 */

use entity_acl::groups::{GroupDirectory, User};
use entity_acl::permissions::{
    merge_grant, AccessChecker, EntityPermissionRecord, PermissionError, PermissionKind,
    PermissionManager, RecordProvider,
};
use entity_acl::storage::MemoryStore;
use entity_acl::EntityId;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn fixture() -> (Arc<MemoryStore>, Arc<GroupDirectory>, PermissionManager) {
    let store = Arc::new(MemoryStore::new());
    let directory = Arc::new(GroupDirectory::new());
    let manager = PermissionManager::new(store.clone(), directory.clone());
    (store, directory, manager)
}

#[test]
fn test_grant_and_check_scenario() {
    // Entity E1, groups G1 (View) and G2 (Edit)
    let (_, directory, manager) = fixture();
    let g1 = directory.group_if_not_exists("g1", "View group");
    let g2 = directory.group_if_not_exists("g2", "Edit group");
    let e1 = EntityId::new();

    manager.add_permission(e1, &g1, PermissionKind::VIEW).unwrap();
    manager.add_permission(e1, &g2, PermissionKind::EDIT).unwrap();

    // One record with both grants
    let record = manager.get_for_entity(e1).unwrap().unwrap();
    assert_eq!(record.grants.len(), 2);
    assert_eq!(record.kinds_for(g1.guid), PermissionKind::VIEW);
    assert_eq!(record.kinds_for(g2.guid), PermissionKind::EDIT);

    // A user only in G1 is denied View|Edit but allowed View
    let user = User::new("alice").with_group(g1.guid);
    assert!(
        !manager
            .allows_access_type(e1, &user, PermissionKind::VIEW | PermissionKind::EDIT)
            .unwrap(),
        "Should deny View|Edit with only G1 membership"
    );
    assert!(
        manager
            .allows_access_type(e1, &user, PermissionKind::VIEW)
            .unwrap(),
        "Should allow View"
    );
}

#[test]
fn test_idempotent_grant() {
    let (store, directory, manager) = fixture();
    let group = directory.group_if_not_exists("editors", "");
    let entity = EntityId::new();
    let kinds = PermissionKind::VIEW | PermissionKind::EDIT;

    manager.add_permission(entity, &group, kinds).unwrap();
    let once = manager.get_for_entity(entity).unwrap().unwrap();

    manager.add_permission(entity, &group, kinds).unwrap();
    let twice = manager.get_for_entity(entity).unwrap().unwrap();

    assert_eq!(once, twice);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_zero_identifier_rejection() {
    let (store, directory, manager) = fixture();
    let group = directory.group_if_not_exists("editors", "");

    let err = manager
        .add_permission(EntityId::nil(), &group, PermissionKind::VIEW)
        .unwrap_err();
    assert!(matches!(err, PermissionError::InvalidState { .. }));
    assert!(store.is_empty(), "No record may be created for the nil id");
}

#[test]
fn test_second_grant_in_same_unit_of_work_reuses_record() {
    let (store, directory, manager) = fixture();
    let g1 = directory.group_if_not_exists("g1", "");
    let g2 = directory.group_if_not_exists("g2", "");
    let entity = EntityId::new();

    manager.add_permission(entity, &g1, PermissionKind::VIEW).unwrap();
    manager.add_permission(entity, &g2, PermissionKind::EDIT).unwrap();

    // One row, not two; the second grant found the first record
    assert_eq!(store.len(), 1);
    let stats = manager.pending_stats();
    assert_eq!(stats.size, 1);
}

#[test]
fn test_add_whole_record_new_entity_inserts_fresh_copy() {
    let (_, directory, manager) = fixture();
    let group = directory.group_if_not_exists("editors", "");
    let entity = EntityId::new();

    let mut incoming = EntityPermissionRecord::new(entity);
    merge_grant(&mut incoming, group.guid, PermissionKind::CREATE);
    // A stale key on the incoming record must not survive the insert
    incoming.key = Some(777);

    manager.add(&incoming).unwrap();

    let record = manager.get_for_entity(entity).unwrap().unwrap();
    assert_ne!(record.key, Some(777));
    assert_eq!(record.kinds_for(group.guid), PermissionKind::CREATE);
}

#[test]
fn test_update_range_applies_in_order() {
    let (_, directory, manager) = fixture();
    let group = directory.group_if_not_exists("editors", "");

    let entities: Vec<EntityId> = (0..3).map(|_| EntityId::new()).collect();
    let records: Vec<EntityPermissionRecord> = entities
        .iter()
        .map(|entity| {
            let mut record = EntityPermissionRecord::new(*entity);
            merge_grant(&mut record, group.guid, PermissionKind::VIEW);
            record
        })
        .collect();

    manager.update_range(records.iter()).unwrap();

    for entity in &entities {
        assert!(manager.get_for_entity(*entity).unwrap().is_some());
    }
}

#[test]
fn test_audit_trail_of_checks() {
    let (_, directory, manager) = fixture();
    let group = directory.group_if_not_exists("editors", "");
    let entity = EntityId::new();
    manager.add_permission(entity, &group, PermissionKind::VIEW).unwrap();

    let member = User::new("alice").with_group(group.guid);
    let outsider = User::new("mallory");

    manager.check_and_audit(&member, entity, PermissionKind::VIEW).unwrap();
    manager.check_and_audit(&outsider, entity, PermissionKind::VIEW).unwrap();
    manager
        .check_and_audit(&outsider, entity, PermissionKind::ADMINISTER)
        .unwrap();

    let stats = manager.audit_stats();
    assert_eq!(stats.total_events, 3);
    assert_eq!(stats.total_denials, 2);
    assert_eq!(manager.audit().denial_count(outsider.guid), 2);
    assert_eq!(manager.audit().denial_count(member.guid), 0);

    let recent = manager.audit().recent(10);
    assert_eq!(recent.len(), 3);
}

#[test]
fn test_check_batch_is_per_item_isolated() {
    let (_, directory, manager) = fixture();
    let group = directory.group_if_not_exists("editors", "");
    let granted = EntityId::new();
    let ungranted = EntityId::new();
    manager.add_permission(granted, &group, PermissionKind::VIEW).unwrap();

    let member = User::new("alice").with_group(group.guid);
    let results = manager.check_batch(
        &member,
        &[
            (granted, PermissionKind::VIEW),
            (ungranted, PermissionKind::VIEW),
            (granted, PermissionKind::DELETE),
        ],
    );

    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().unwrap().is_allowed());
    assert!(!results[1].as_ref().unwrap().is_allowed());
    assert!(!results[2].as_ref().unwrap().is_allowed());
}
