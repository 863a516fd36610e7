/*!
 * Concurrency Integration Tests
 * Uncoordinated writers race; consolidating reads restore the invariant
 */

use entity_acl::groups::{GroupDirectory, User};
use entity_acl::permissions::{
    merge_grant, Consolidator, EntityPermissionRecord, PermissionKind, PermissionManager,
    RecordProvider,
};
use entity_acl::storage::{MemoryStore, RecordStore};
use entity_acl::{EntityId, GroupId};
use std::sync::Arc;
use std::thread;

#[test]
fn test_racing_first_grants_heal_without_losing_grants() {
    let store = Arc::new(MemoryStore::new());
    let entity = EntityId::new();
    let groups: Vec<GroupId> = (0..4).map(|_| GroupId::new()).collect();

    // Four writers insert a record for the same entity with no coordination,
    // the worst case a first-grant race can produce
    let handles: Vec<_> = groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let store = store.clone();
            let group = *group;
            thread::spawn(move || {
                let mut record = EntityPermissionRecord::new(entity);
                merge_grant(&mut record, group, PermissionKind::from_bits_truncate(1 << i));
                store.insert(record).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.find_by_entity(entity).len(), 4);

    // One consolidating read heals all duplicates
    let consolidator = Consolidator::new(store.clone());
    let canonical = consolidator.canonical(entity).unwrap().unwrap();

    assert_eq!(store.find_by_entity(entity).len(), 1);
    for (i, group) in groups.iter().enumerate() {
        assert_eq!(
            canonical.kinds_for(*group),
            PermissionKind::from_bits_truncate(1 << i),
            "grant {} must survive consolidation",
            i
        );
    }
}

#[test]
fn test_concurrent_consolidating_reads_are_benign() {
    let store = Arc::new(MemoryStore::new());
    let entity = EntityId::new();
    let g1 = GroupId::new();
    let g2 = GroupId::new();

    for (group, kinds) in [(g1, PermissionKind::VIEW), (g2, PermissionKind::EDIT)] {
        let mut record = EntityPermissionRecord::new(entity);
        merge_grant(&mut record, group, kinds);
        store.insert(record).unwrap();
    }

    // Several readers consolidate the same entity at once; every one of
    // them must observe both grants, whoever wins the healing race
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                let consolidator = Consolidator::new(store);
                consolidator.canonical(entity).unwrap().unwrap()
            })
        })
        .collect();

    for handle in handles {
        let canonical = handle.join().unwrap();
        assert_eq!(canonical.kinds_for(g1), PermissionKind::VIEW);
        assert_eq!(canonical.kinds_for(g2), PermissionKind::EDIT);
    }
    assert_eq!(store.find_by_entity(entity).len(), 1);
}

#[test]
fn test_independent_managers_converge_on_one_record() {
    let store = Arc::new(MemoryStore::new());
    let directory = Arc::new(GroupDirectory::new());
    let g1 = directory.group_if_not_exists("g1", "");
    let g2 = directory.group_if_not_exists("g2", "");
    let entity = EntityId::new();

    // Two unrelated units of work, each with its own manager and therefore
    // its own pending-write cache, grant concurrently
    let handles: Vec<_> = [(g1.clone(), PermissionKind::VIEW), (g2.clone(), PermissionKind::EDIT)]
        .into_iter()
        .map(|(group, kinds)| {
            let store = store.clone();
            let directory = directory.clone();
            thread::spawn(move || {
                let manager = PermissionManager::new(store, directory);
                manager.add_permission(entity, &group, kinds).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Whatever the interleaving produced, the next consolidating read
    // settles on one record carrying both grants
    let manager = PermissionManager::new(store.clone(), directory);
    let record = manager.get_for_entity(entity).unwrap().unwrap();
    assert_eq!(record.kinds_for(g1.guid), PermissionKind::VIEW);
    assert_eq!(record.kinds_for(g2.guid), PermissionKind::EDIT);
    assert_eq!(store.find_by_entity(entity).len(), 1);
}

#[test]
fn test_checks_stay_correct_while_healing_elsewhere() {
    let store = Arc::new(MemoryStore::new());
    let directory = Arc::new(GroupDirectory::new());
    let group = directory.group_if_not_exists("editors", "");
    let entity = EntityId::new();

    for _ in 0..2 {
        let mut record = EntityPermissionRecord::new(entity);
        merge_grant(&mut record, group.guid, PermissionKind::VIEW);
        store.insert(record).unwrap();
    }

    let user = User::new("alice").with_group(group.guid);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let directory = directory.clone();
            let user = user.clone();
            thread::spawn(move || {
                let manager = PermissionManager::new(store, directory);
                manager
                    .allows_access_type(entity, &user, PermissionKind::VIEW)
                    .unwrap()
            })
        })
        .collect();

    // In-flight healing on other threads never flips a correct allow
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
