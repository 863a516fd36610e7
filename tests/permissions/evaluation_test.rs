/*!
 * Access Evaluation Integration Tests
 */

use entity_acl::groups::{GroupDirectory, Role, User};
use entity_acl::permissions::{AccessChecker, PermissionKind, PermissionManager};
use entity_acl::storage::MemoryStore;
use entity_acl::EntityId;
use std::sync::Arc;

fn fixture() -> (Arc<GroupDirectory>, PermissionManager) {
    let directory = Arc::new(GroupDirectory::new());
    let manager = PermissionManager::new(Arc::new(MemoryStore::new()), directory.clone());
    (directory, manager)
}

#[test]
fn test_no_record_denies_any_request() {
    let (_, manager) = fixture();
    let user = User::new("alice");

    for kinds in [
        PermissionKind::VIEW,
        PermissionKind::EDIT | PermissionKind::DELETE,
        PermissionKind::FULL,
    ] {
        assert!(
            !manager
                .allows_access_type(EntityId::new(), &user, kinds)
                .unwrap(),
            "Should deny {} with no record",
            kinds
        );
    }
}

#[test]
fn test_role_conferred_groups_grant_access() {
    let (directory, manager) = fixture();
    let auditors = directory.group_if_not_exists("auditors", "");
    let entity = EntityId::new();
    manager.add_permission(entity, &auditors, PermissionKind::VIEW).unwrap();

    // User is not directly in auditors; a role confers it
    let role = Role::new("compliance", "").with_group(auditors.guid);
    directory.register_role(role.clone());
    let user = User::new("alice").with_role(role.guid);

    assert!(manager
        .allows_access_type(entity, &user, PermissionKind::VIEW)
        .unwrap());
}

#[test]
fn test_direct_and_role_groups_accumulate() {
    let (directory, manager) = fixture();
    let viewers = directory.group_if_not_exists("viewers", "");
    let editors = directory.group_if_not_exists("editors", "");
    let entity = EntityId::new();

    manager.add_permission(entity, &viewers, PermissionKind::VIEW).unwrap();
    manager.add_permission(entity, &editors, PermissionKind::EDIT).unwrap();

    let role = Role::new("staff", "").with_group(editors.guid);
    directory.register_role(role.clone());

    let user = User::new("alice")
        .with_group(viewers.guid)
        .with_role(role.guid);

    assert!(manager
        .allows_access_type(entity, &user, PermissionKind::VIEW | PermissionKind::EDIT)
        .unwrap());
}

#[test]
fn test_gaining_a_group_never_loses_access() {
    let (directory, manager) = fixture();
    let viewers = directory.group_if_not_exists("viewers", "");
    let interns = directory.group_if_not_exists("interns", "");
    let entity = EntityId::new();

    manager.add_permission(entity, &viewers, PermissionKind::VIEW).unwrap();
    // interns hold no grant on this entity at all
    manager
        .add_permission(EntityId::new(), &interns, PermissionKind::VIEW)
        .unwrap();

    let before = User::new("alice").with_group(viewers.guid);
    let after = before.clone().with_group(interns.guid);

    assert!(manager
        .allows_access_type(entity, &before, PermissionKind::VIEW)
        .unwrap());
    assert!(manager
        .allows_access_type(entity, &after, PermissionKind::VIEW)
        .unwrap());
}

#[test]
fn test_all_requested_bits_must_be_covered() {
    let (directory, manager) = fixture();
    let group = directory.group_if_not_exists("editors", "");
    let entity = EntityId::new();

    manager
        .add_permission(
            entity,
            &group,
            PermissionKind::VIEW | PermissionKind::EDIT | PermissionKind::CREATE,
        )
        .unwrap();

    let user = User::new("alice").with_group(group.guid);

    assert!(manager
        .allows_access_type(entity, &user, PermissionKind::VIEW | PermissionKind::CREATE)
        .unwrap());
    // DELETE is missing, so the whole request is denied
    assert!(!manager
        .allows_access_type(
            entity,
            &user,
            PermissionKind::VIEW | PermissionKind::DELETE
        )
        .unwrap());
}

#[test]
fn test_decision_carries_reason() {
    let (directory, manager) = fixture();
    let group = directory.group_if_not_exists("editors", "");
    let entity = EntityId::new();
    manager.add_permission(entity, &group, PermissionKind::VIEW).unwrap();

    let outsider = User::new("mallory");
    let decision = manager.check(&outsider, entity, PermissionKind::VIEW).unwrap();

    assert!(!decision.is_allowed());
    assert!(
        decision.reason().contains("do not cover"),
        "unexpected reason: {}",
        decision.reason()
    );

    let missing = manager
        .check(&outsider, EntityId::new(), PermissionKind::VIEW)
        .unwrap();
    assert_eq!(missing.reason(), "no permission record for entity");
}
