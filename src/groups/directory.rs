/*!
 * Group Directory
 * In-process registry for security groups, roles, and users
 */

use super::traits::GroupProvider;
use super::types::{Role, SecurityGroup, User};
use crate::core::types::{GroupId, RoleId};
use ahash::{AHashSet, RandomState};
use dashmap::DashMap;
use log::{debug, info};

/// Directory of security groups and roles.
///
/// Canonical resolution goes through here: a grant always references the
/// directory's copy of a group, never a caller-supplied transient instance.
#[derive(Default)]
pub struct GroupDirectory {
    groups: DashMap<GroupId, SecurityGroup, RandomState>,
    roles: DashMap<RoleId, Role, RandomState>,
}

impl GroupDirectory {
    pub fn new() -> Self {
        Self {
            groups: DashMap::with_hasher(RandomState::new()),
            roles: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Register a group, replacing any previous registration with the same id
    pub fn register_group(&self, group: SecurityGroup) {
        debug!("registered security group '{}' ({})", group.name, group.guid);
        self.groups.insert(group.guid, group);
    }

    /// Register a role, replacing any previous registration with the same id
    pub fn register_role(&self, role: Role) {
        debug!("registered role '{}' ({})", role.name, role.guid);
        self.roles.insert(role.guid, role);
    }

    /// Get a group by name
    pub fn group_by_name(&self, name: &str) -> Option<SecurityGroup> {
        self.groups
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.clone())
    }

    /// Get a role by name
    pub fn role_by_name(&self, name: &str) -> Option<Role> {
        self.roles
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.clone())
    }

    /// Return the group with a matching name, creating it if absent
    pub fn group_if_not_exists(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> SecurityGroup {
        let name = name.into();
        if let Some(existing) = self.group_by_name(&name) {
            return existing;
        }

        let group = SecurityGroup::new(name, description);
        info!("created security group '{}' ({})", group.name, group.guid);
        self.groups.insert(group.guid, group.clone());
        group
    }

    /// Return the role with a matching name, creating it if absent
    pub fn role_if_not_exists(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Role {
        let name = name.into();
        if let Some(existing) = self.role_by_name(&name) {
            return existing;
        }

        let role = Role::new(name, description);
        info!("created role '{}' ({})", role.name, role.guid);
        self.roles.insert(role.guid, role.clone());
        role
    }

    /// Whether a role with this name is registered
    pub fn role_exists(&self, name: &str) -> bool {
        self.role_by_name(name).is_some()
    }

    /// Groups assigned to all new users
    pub fn default_groups(&self) -> Vec<SecurityGroup> {
        self.groups
            .iter()
            .filter(|entry| entry.is_default)
            .map(|entry| entry.clone())
            .collect()
    }

    /// Roles assigned to all new users
    pub fn default_roles(&self) -> Vec<Role> {
        self.roles
            .iter()
            .filter(|entry| entry.is_default)
            .map(|entry| entry.clone())
            .collect()
    }

    /// Assign every default group and role this directory knows to a user.
    ///
    /// Already-assigned defaults are not duplicated.
    pub fn apply_defaults(&self, user: &mut User) {
        for group in self.default_groups() {
            if !user.groups.contains(&group.guid) {
                user.groups.push(group.guid);
            }
        }
        for role in self.default_roles() {
            if !user.roles.contains(&role.guid) {
                user.roles.push(role.guid);
            }
        }
    }
}

impl GroupProvider for GroupDirectory {
    fn resolve_group(&self, id: GroupId) -> Option<SecurityGroup> {
        self.groups.get(&id).map(|entry| entry.clone())
    }

    fn applicable_groups(&self, user: &User) -> AHashSet<GroupId> {
        let mut applicable: AHashSet<GroupId> = user.groups.iter().copied().collect();

        // One level of role expansion; nested groups are out of scope here
        for role_id in &user.roles {
            if let Some(role) = self.roles.get(role_id) {
                applicable.extend(role.groups.iter().copied());
            }
        }

        applicable
    }
}
