//! Authorization Service
//!
//! Permission-based access control with role resolution.
//!
//! Permissions form a closed set: every gate the admin module checks is a
//! variant of [`AdminPermission`], so an unknown permission name is a
//! compile error at the call site and a resolution miss when it comes out
//! of the database.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::AccessTokenClaims;
use crate::permission::PermissionGroupStore;
use crate::role::{RoleStore, ADMIN_SLUG};
use crate::shared::cache::PermissionCache;
use crate::shared::error::{AdminError, Result};

/// The closed set of admin permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminPermission {
    ListRole,
    CreateRole,
    EditRole,
    DeleteRole,
    ListPermission,
    AssignPermission,
}

impl AdminPermission {
    pub const ALL: [AdminPermission; 6] = [
        AdminPermission::ListRole,
        AdminPermission::CreateRole,
        AdminPermission::EditRole,
        AdminPermission::DeleteRole,
        AdminPermission::ListPermission,
        AdminPermission::AssignPermission,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminPermission::ListRole => "list_role",
            AdminPermission::CreateRole => "create_role",
            AdminPermission::EditRole => "edit_role",
            AdminPermission::DeleteRole => "delete_role",
            AdminPermission::ListPermission => "list_permission",
            AdminPermission::AssignPermission => "assign_permission",
        }
    }

    /// Parse a stored permission name. Unknown names resolve to `None`
    /// rather than an error so stale database rows grant nothing.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "list_role" => Some(AdminPermission::ListRole),
            "create_role" => Some(AdminPermission::CreateRole),
            "edit_role" => Some(AdminPermission::EditRole),
            "delete_role" => Some(AdminPermission::DeleteRole),
            "list_permission" => Some(AdminPermission::ListPermission),
            "assign_permission" => Some(AdminPermission::AssignPermission),
            _ => None,
        }
    }
}

/// Authorization context for a request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Principal ID
    pub principal_id: String,

    /// Display name
    pub name: String,

    /// Slug of the role the principal holds
    pub role_slug: String,

    /// Permissions resolved from the role
    pub permissions: HashSet<AdminPermission>,
}

impl AuthContext {
    /// Create from JWT claims with resolved permissions
    pub fn from_claims_with_permissions(
        claims: &AccessTokenClaims,
        permissions: HashSet<AdminPermission>,
    ) -> Self {
        Self {
            principal_id: claims.sub.clone(),
            name: claims.name.clone(),
            role_slug: claims.role.clone(),
            permissions,
        }
    }

    /// Check if this context belongs to the built-in admin role
    pub fn is_admin(&self) -> bool {
        self.role_slug == ADMIN_SLUG
    }

    /// Check if this context has a specific permission
    pub fn has_permission(&self, permission: AdminPermission) -> bool {
        self.is_admin() || self.permissions.contains(&permission)
    }
}

/// Authorization service for resolving role permissions and checking them
pub struct AuthorizationService {
    role_store: Arc<dyn RoleStore>,
    group_store: Arc<dyn PermissionGroupStore>,
    cache: Arc<PermissionCache>,
}

impl AuthorizationService {
    pub fn new(
        role_store: Arc<dyn RoleStore>,
        group_store: Arc<dyn PermissionGroupStore>,
        cache: Arc<PermissionCache>,
    ) -> Self {
        Self {
            role_store,
            group_store,
            cache,
        }
    }

    /// Build an authorization context from JWT claims
    /// Resolves all permissions from the principal's role
    pub async fn build_context(&self, claims: &AccessTokenClaims) -> Result<AuthContext> {
        let permissions = self.resolve_permissions(&claims.role).await?;
        Ok(AuthContext::from_claims_with_permissions(claims, permissions))
    }

    /// Resolve the permission set for a role slug, cached per slug.
    async fn resolve_permissions(&self, role_slug: &str) -> Result<HashSet<AdminPermission>> {
        // The admin role holds every permission implicitly, no lookup needed
        if role_slug == ADMIN_SLUG {
            return Ok(AdminPermission::ALL.into_iter().collect());
        }

        if let Some(cached) = self.cache.get(role_slug) {
            return Ok(cached);
        }

        let role = match self.role_store.find_by_slug(role_slug).await? {
            Some(role) => role,
            None => return Ok(HashSet::new()),
        };

        if !role.status {
            return Ok(HashSet::new());
        }

        let granted_ids: HashSet<&str> =
            role.permission_ids.iter().map(String::as_str).collect();

        let mut permissions = HashSet::new();
        for group in self.group_store.find_all_with_permissions().await? {
            for permission in &group.permissions {
                if granted_ids.contains(permission.id.as_str()) {
                    if let Some(parsed) = AdminPermission::from_name(&permission.name) {
                        permissions.insert(parsed);
                    }
                }
            }
        }

        self.cache.put(role_slug, permissions.clone());
        Ok(permissions)
    }

    /// Require specific permission
    pub fn require_permission(
        &self,
        context: &AuthContext,
        permission: AdminPermission,
    ) -> Result<()> {
        require_permission(context, permission)
    }
}

/// Require a specific permission on a context
pub fn require_permission(context: &AuthContext, permission: AdminPermission) -> Result<()> {
    if !context.has_permission(permission) {
        return Err(AdminError::forbidden(format!(
            "Permission required: {}",
            permission.as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_context(role_slug: &str, permissions: Vec<AdminPermission>) -> AuthContext {
        AuthContext {
            principal_id: "user123".to_string(),
            name: "Test User".to_string(),
            role_slug: role_slug.to_string(),
            permissions: permissions.into_iter().collect(),
        }
    }

    #[test]
    fn test_direct_permission() {
        let ctx = create_test_context("editor", vec![AdminPermission::ListRole]);
        assert!(ctx.has_permission(AdminPermission::ListRole));
        assert!(!ctx.has_permission(AdminPermission::DeleteRole));
    }

    #[test]
    fn test_admin_role_has_everything() {
        let ctx = create_test_context(ADMIN_SLUG, vec![]);
        for permission in AdminPermission::ALL {
            assert!(ctx.has_permission(permission));
        }
    }

    #[test]
    fn test_require_permission_forbidden() {
        let ctx = create_test_context("viewer", vec![AdminPermission::ListRole]);
        assert!(require_permission(&ctx, AdminPermission::ListRole).is_ok());

        let err = require_permission(&ctx, AdminPermission::CreateRole).unwrap_err();
        assert!(matches!(err, AdminError::Forbidden { .. }));
    }

    #[test]
    fn test_unknown_permission_name_grants_nothing() {
        assert_eq!(AdminPermission::from_name("drop_database"), None);
        assert_eq!(
            AdminPermission::from_name("assign_permission"),
            Some(AdminPermission::AssignPermission)
        );
    }
}
