/*!
 * Group Types
 * Security groups, roles, and users
 */

use crate::core::types::{GroupId, RoleId, UserId};
use serde::{Deserialize, Serialize};

/// A named collection that can be granted permissions on entities.
///
/// Groups are shared, long-lived, and independently persisted; permission
/// records reference them by identifier only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub guid: GroupId,
    pub name: String,
    pub description: String,
    /// Assigned to every newly registered user
    #[serde(default)]
    pub is_default: bool,
}

impl SecurityGroup {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            guid: GroupId::new(),
            name: name.into(),
            description: description.into(),
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// A group-like bundle of groups assigned to users.
///
/// A user holding a role is a member of every group the role confers.
/// Expansion is one level deep; nesting rules beyond that are a concern of
/// the directory implementation, not of the permission core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub guid: RoleId,
    pub name: String,
    pub description: String,
    /// Assigned to every newly registered user
    #[serde(default)]
    pub is_default: bool,
    /// Groups this role confers membership of
    #[serde(default)]
    pub groups: Vec<GroupId>,
}

impl Role {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            guid: RoleId::new(),
            name: name.into(),
            description: description.into(),
            is_default: false,
            groups: Vec::new(),
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.groups.push(group);
        self
    }
}

/// An accessing principal with directly assigned groups and roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub guid: UserId,
    pub name: String,
    #[serde(default)]
    pub groups: Vec<GroupId>,
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            guid: UserId::new(),
            name: name.into(),
            groups: Vec::new(),
            roles: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_role(mut self, role: RoleId) -> Self {
        self.roles.push(role);
        self
    }
}
