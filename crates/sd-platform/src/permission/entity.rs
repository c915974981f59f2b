//! Permission Group Entities
//!
//! Grouped permission definitions. Read-only from this module's
//! perspective; roles reference permissions by ID.

use serde::{Deserialize, Serialize};

/// Atomic capability grant, grouped under a PermissionGroup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: String,

    /// Permission name (e.g., "list_role", "assign_permission")
    pub name: String,
}

impl Permission {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A category of permissions, with its permissions embedded in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGroup {
    #[serde(rename = "_id")]
    pub id: String,

    /// Category label (e.g., "Role Management")
    pub group_type: String,

    /// Ordered permission definitions in this group
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl PermissionGroup {
    pub fn new(group_type: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            group_type: group_type.into(),
            permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_builder() {
        let group = PermissionGroup::new("Role Management")
            .with_permission(Permission::new("1", "list_role"))
            .with_permission(Permission::new("2", "create_role"));

        assert_eq!(group.group_type, "Role Management");
        assert_eq!(group.permissions.len(), 2);
        assert_eq!(group.permissions[0].name, "list_role");
    }
}
