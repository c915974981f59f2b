//! Roles Admin API
//!
//! REST endpoints for role management: CRUD, status toggling, and
//! permission assignment. Each handler runs the same pipeline:
//! authorization check, input validation, store mutation, cache
//! invalidation, flash-style response.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::permission::entity::PermissionGroup;
use crate::permission::repository::PermissionGroupStore;
use crate::role::entity::Role;
use crate::role::repository::RoleStore;
use crate::shared::api_common::SuccessResponse;
use crate::shared::authorization_service::{require_permission, AdminPermission};
use crate::shared::cache::CacheInvalidator;
use crate::shared::error::{AdminError, FormError};
use crate::shared::middleware::Authenticated;
use crate::user::repository::UserStore;

/// Create role request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    /// Display name
    pub name: String,

    /// Unique slug identifying the role
    pub slug: String,
}

/// Update role request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    /// Display name
    pub name: String,

    /// Unique slug identifying the role
    pub slug: String,
}

/// Assign permissions request. The submitted set fully replaces the
/// current one; an absent or empty list clears every grant.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignPermissionsRequest {
    #[serde(default)]
    pub permission_ids: Vec<String>,
}

/// Role response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub status: bool,
    pub permission_ids: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Role> for RoleResponse {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            name: r.name,
            slug: r.slug,
            status: r.status,
            permission_ids: r.permission_ids,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

/// Role list response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleListResponse {
    pub roles: Vec<RoleResponse>,
    pub total: usize,
}

/// Blank form payload for the create screen
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormResponse {
    pub name: String,
    pub slug: String,
    pub status: bool,
}

/// Permission DTO nested in a group
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionItem {
    pub id: String,
    pub name: String,
}

/// Permission group DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGroupResponse {
    pub id: String,
    pub group_type: String,
    pub permissions: Vec<PermissionItem>,
}

impl From<PermissionGroup> for PermissionGroupResponse {
    fn from(g: PermissionGroup) -> Self {
        Self {
            id: g.id,
            group_type: g.group_type,
            permissions: g
                .permissions
                .into_iter()
                .map(|p| PermissionItem {
                    id: p.id,
                    name: p.name,
                })
                .collect(),
        }
    }
}

/// Payload for the permission assignment screen
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionFormResponse {
    /// Role being edited
    pub role: RoleResponse,

    /// All permission groups with their nested permissions
    pub groups: Vec<PermissionGroupResponse>,

    /// All other assignable roles (admin excluded)
    pub roles: Vec<RoleResponse>,

    /// Whether the role already carries grants (edit vs first assignment)
    pub is_edit: bool,
}

/// Roles service state
#[derive(Clone)]
pub struct RolesState {
    pub role_store: Arc<dyn RoleStore>,
    pub user_store: Arc<dyn UserStore>,
    pub group_store: Arc<dyn PermissionGroupStore>,
    pub cache: Arc<dyn CacheInvalidator>,
}

fn validate_role_input(name: &str, slug: &str) -> Result<(), AdminError> {
    if name.trim().is_empty() {
        return Err(AdminError::validation("Role name is required"));
    }
    if slug.trim().is_empty() {
        return Err(AdminError::validation("Role slug is required"));
    }
    Ok(())
}

/// Attach the submitted input to a failed form response.
fn form_error<T: Serialize>(error: AdminError, submitted: &T) -> FormError {
    match serde_json::to_value(submitted) {
        Ok(value) => FormError::with_input(error, value),
        Err(_) => FormError::new(error),
    }
}

async fn invalidate_cache(state: &RolesState) {
    // The store commit already happened; staleness here is logged, not fatal.
    if let Err(e) = state.cache.invalidate_all().await {
        warn!("Permission cache invalidation failed: {}", e);
    }
}

/// List roles
#[utoipa::path(
    get,
    path = "",
    tag = "roles",
    operation_id = "getApiAdminRoles",
    responses(
        (status = 200, description = "List of roles", body = RoleListResponse),
        (status = 403, description = "Missing list_role permission")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_roles(
    State(state): State<RolesState>,
    auth: Authenticated,
) -> Result<Json<RoleListResponse>, AdminError> {
    require_permission(&auth.0, AdminPermission::ListRole)?;

    let roles: Vec<RoleResponse> = state
        .role_store
        .find_all()
        .await?
        .into_iter()
        .map(|r| r.into())
        .collect();

    let total = roles.len();
    Ok(Json(RoleListResponse { roles, total }))
}

/// Get the blank create form payload
#[utoipa::path(
    get,
    path = "/create",
    tag = "roles",
    operation_id = "getApiAdminRolesCreate",
    responses(
        (status = 200, description = "Blank form defaults", body = CreateFormResponse),
        (status = 403, description = "Missing create_role permission")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_role_form(
    auth: Authenticated,
) -> Result<Json<CreateFormResponse>, AdminError> {
    require_permission(&auth.0, AdminPermission::CreateRole)?;

    Ok(Json(CreateFormResponse {
        name: String::new(),
        slug: String::new(),
        status: true,
    }))
}

/// Create a new role
#[utoipa::path(
    post,
    path = "",
    tag = "roles",
    operation_id = "postApiAdminRoles",
    request_body = CreateRoleRequest,
    responses(
        (status = 200, description = "Role created", body = SuccessResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Duplicate slug")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    State(state): State<RolesState>,
    auth: Authenticated,
    Json(req): Json<CreateRoleRequest>,
) -> Result<Json<SuccessResponse>, FormError> {
    require_permission(&auth.0, AdminPermission::CreateRole)?;

    // Every failure past the gate echoes the submitted input back
    create_role_in_store(&state, &req)
        .await
        .map_err(|e| form_error(e, &req))?;

    invalidate_cache(&state).await;

    Ok(Json(SuccessResponse::with_message(
        "New Role Added Successfully",
    )))
}

async fn create_role_in_store(
    state: &RolesState,
    req: &CreateRoleRequest,
) -> Result<(), AdminError> {
    validate_role_input(&req.name, &req.slug)?;

    if state.role_store.exists_by_slug(&req.slug).await? {
        return Err(AdminError::duplicate("Role", "slug", &req.slug));
    }

    let role = Role::new(&req.name, &req.slug);
    state.role_store.insert(&role).await?;
    Ok(())
}

/// Get a role for the edit form
#[utoipa::path(
    get,
    path = "/{id}/edit",
    tag = "roles",
    operation_id = "getApiAdminRolesByIdEdit",
    params(
        ("id" = String, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role found", body = RoleResponse),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Admin role cannot be edited")
    ),
    security(("bearer_auth" = []))
)]
pub async fn edit_role_form(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<RoleResponse>, AdminError> {
    require_permission(&auth.0, AdminPermission::EditRole)?;

    let role = state
        .role_store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AdminError::not_found("Role Detail", &id))?;

    if role.is_admin() {
        return Err(AdminError::forbidden_operation("Cannot Edit Admin Role"));
    }

    Ok(Json(role.into()))
}

/// Update a role
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "roles",
    operation_id = "putApiAdminRolesById",
    params(
        ("id" = String, Path, description = "Role ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = SuccessResponse),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Duplicate slug")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<SuccessResponse>, FormError> {
    require_permission(&auth.0, AdminPermission::EditRole)?;

    // Every failure past the gate echoes the submitted input back
    update_role_in_store(&state, &id, &req)
        .await
        .map_err(|e| form_error(e, &req))?;

    invalidate_cache(&state).await;

    Ok(Json(SuccessResponse::with_message(
        "Role Detail Updated Successfully",
    )))
}

async fn update_role_in_store(
    state: &RolesState,
    id: &str,
    req: &UpdateRoleRequest,
) -> Result<(), AdminError> {
    let mut role = state
        .role_store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AdminError::not_found("Role Detail", id))?;

    validate_role_input(&req.name, &req.slug)?;

    // Slug must stay unique across other roles
    if req.slug != role.slug && state.role_store.exists_by_slug(&req.slug).await? {
        return Err(AdminError::duplicate("Role", "slug", &req.slug));
    }

    role.name = req.name.clone();
    role.slug = req.slug.clone();
    role.updated_at = chrono::Utc::now();
    state.role_store.update(&role).await?;
    Ok(())
}

/// Toggle a role's active status
#[utoipa::path(
    patch,
    path = "/{id}/toggle",
    tag = "roles",
    operation_id = "patchApiAdminRolesByIdToggle",
    params(
        ("id" = String, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Status flipped", body = SuccessResponse),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_role_status(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AdminError> {
    require_permission(&auth.0, AdminPermission::EditRole)?;

    state.role_store.toggle_status(&id).await?;

    Ok(Json(SuccessResponse::with_message(
        "Status Changed Successfully",
    )))
}

/// Delete a role
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "roles",
    operation_id = "deleteApiAdminRolesById",
    params(
        ("id" = String, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role deleted", body = SuccessResponse),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Admin role or role still assigned")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_role(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AdminError> {
    require_permission(&auth.0, AdminPermission::DeleteRole)?;

    let role = state
        .role_store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AdminError::not_found("Role Detail", &id))?;

    if role.is_admin() {
        return Err(AdminError::forbidden_operation("Cannot Delete Admin Role"));
    }

    // A role still held by any user cannot be removed
    if state.user_store.find_any_by_role(&role.id).await?.is_some() {
        return Err(AdminError::forbidden_operation(
            "Cannot Delete Assigned Role",
        ));
    }

    state.role_store.delete(&role.id).await?;

    invalidate_cache(&state).await;

    Ok(Json(SuccessResponse::with_message(
        "Role Detail Deleted Successfully",
    )))
}

/// Get the permission assignment form payload
#[utoipa::path(
    get,
    path = "/{id}/permissions",
    tag = "roles",
    operation_id = "getApiAdminRolesByIdPermissions",
    params(
        ("id" = String, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Groups and current grants", body = PermissionFormResponse),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Admin role permissions are fixed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn permission_form(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<PermissionFormResponse>, AdminError> {
    require_permission(&auth.0, AdminPermission::ListPermission)?;

    let role = state
        .role_store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AdminError::not_found("Role Detail", &id))?;

    if role.is_admin() {
        return Err(AdminError::forbidden_operation(
            "Admin Role Is Always Assigned With All Permission",
        ));
    }

    let groups: Vec<PermissionGroupResponse> = state
        .group_store
        .find_all_with_permissions()
        .await?
        .into_iter()
        .map(|g| g.into())
        .collect();

    let roles: Vec<RoleResponse> = state
        .role_store
        .find_all_except_admin()
        .await?
        .into_iter()
        .map(|r| r.into())
        .collect();

    let is_edit = role.has_permissions();

    Ok(Json(PermissionFormResponse {
        role: role.into(),
        groups,
        roles,
        is_edit,
    }))
}

/// Replace a role's permission set
#[utoipa::path(
    post,
    path = "/{id}/permissions",
    tag = "roles",
    operation_id = "postApiAdminRolesByIdPermissions",
    params(
        ("id" = String, Path, description = "Role ID")
    ),
    request_body = AssignPermissionsRequest,
    responses(
        (status = 200, description = "Permissions replaced", body = SuccessResponse),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn assign_permissions(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<AssignPermissionsRequest>,
) -> Result<Json<SuccessResponse>, AdminError> {
    require_permission(&auth.0, AdminPermission::AssignPermission)?;

    let role = state
        .role_store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AdminError::not_found("Role Detail", &id))?;

    state
        .role_store
        .sync_permissions(&role.id, &req.permission_ids)
        .await?;

    Ok(Json(SuccessResponse::with_message(
        "Permission Updated To Role Successfully",
    )))
}

/// Create roles router
pub fn roles_router(state: RolesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_roles, create_role))
        .routes(routes!(create_role_form))
        .routes(routes!(edit_role_form))
        .routes(routes!(update_role, delete_role))
        .routes(routes!(toggle_role_status))
        .routes(routes!(permission_form, assign_permissions))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::entity::Permission;
    use crate::role::entity::ADMIN_SLUG;
    use crate::shared::authorization_service::AuthContext;
    use crate::shared::cache::RecordingInvalidator;
    use crate::user::entity::User;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryRoleStore {
        roles: Mutex<Vec<Role>>,
    }

    impl InMemoryRoleStore {
        fn with_roles(roles: Vec<Role>) -> Self {
            Self {
                roles: Mutex::new(roles),
            }
        }

        fn snapshot(&self) -> Vec<Role> {
            self.roles.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RoleStore for InMemoryRoleStore {
        async fn insert(&self, role: &Role) -> crate::shared::error::Result<()> {
            self.roles.lock().unwrap().push(role.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> crate::shared::error::Result<Option<Role>> {
            Ok(self
                .roles
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned())
        }

        async fn find_by_slug(&self, slug: &str) -> crate::shared::error::Result<Option<Role>> {
            Ok(self
                .roles
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.slug == slug)
                .cloned())
        }

        async fn find_all(&self) -> crate::shared::error::Result<Vec<Role>> {
            Ok(self.snapshot())
        }

        async fn find_all_except_admin(&self) -> crate::shared::error::Result<Vec<Role>> {
            Ok(self
                .snapshot()
                .into_iter()
                .filter(|r| r.slug != ADMIN_SLUG)
                .collect())
        }

        async fn exists_by_slug(&self, slug: &str) -> crate::shared::error::Result<bool> {
            Ok(self.roles.lock().unwrap().iter().any(|r| r.slug == slug))
        }

        async fn update(&self, role: &Role) -> crate::shared::error::Result<()> {
            let mut roles = self.roles.lock().unwrap();
            if let Some(existing) = roles.iter_mut().find(|r| r.id == role.id) {
                *existing = role.clone();
            }
            Ok(())
        }

        async fn delete(&self, id: &str) -> crate::shared::error::Result<bool> {
            let mut roles = self.roles.lock().unwrap();
            let before = roles.len();
            roles.retain(|r| r.id != id);
            Ok(roles.len() < before)
        }

        async fn toggle_status(&self, id: &str) -> crate::shared::error::Result<()> {
            let mut roles = self.roles.lock().unwrap();
            let role = roles
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| AdminError::not_found("Role", id))?;
            role.status = !role.status;
            role.updated_at = chrono::Utc::now();
            Ok(())
        }

        async fn sync_permissions(
            &self,
            id: &str,
            permission_ids: &[String],
        ) -> crate::shared::error::Result<()> {
            let mut roles = self.roles.lock().unwrap();
            let role = roles
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| AdminError::not_found("Role", id))?;
            role.permission_ids = permission_ids.to_vec();
            role.updated_at = chrono::Utc::now();
            Ok(())
        }
    }

    #[derive(Default)]
    struct InMemoryUserStore {
        users: Vec<User>,
    }

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn find_any_by_role(
            &self,
            role_id: &str,
        ) -> crate::shared::error::Result<Option<User>> {
            Ok(self
                .users
                .iter()
                .find(|u| u.role_id.as_deref() == Some(role_id))
                .cloned())
        }
    }

    #[derive(Default)]
    struct InMemoryGroupStore {
        groups: Vec<PermissionGroup>,
    }

    #[async_trait]
    impl PermissionGroupStore for InMemoryGroupStore {
        async fn find_all_with_permissions(
            &self,
        ) -> crate::shared::error::Result<Vec<PermissionGroup>> {
            Ok(self.groups.clone())
        }
    }

    struct TestHarness {
        state: RolesState,
        role_store: Arc<InMemoryRoleStore>,
        invalidator: Arc<RecordingInvalidator>,
    }

    fn harness(roles: Vec<Role>, users: Vec<User>, groups: Vec<PermissionGroup>) -> TestHarness {
        let role_store = Arc::new(InMemoryRoleStore::with_roles(roles));
        let invalidator = Arc::new(RecordingInvalidator::new());
        let state = RolesState {
            role_store: role_store.clone(),
            user_store: Arc::new(InMemoryUserStore { users }),
            group_store: Arc::new(InMemoryGroupStore { groups }),
            cache: invalidator.clone(),
        };
        TestHarness {
            state,
            role_store,
            invalidator,
        }
    }

    fn auth_with(permissions: &[AdminPermission]) -> Authenticated {
        Authenticated(AuthContext {
            principal_id: "user-1".to_string(),
            name: "Test User".to_string(),
            role_slug: "manager".to_string(),
            permissions: permissions.iter().copied().collect(),
        })
    }

    fn full_auth() -> Authenticated {
        auth_with(&AdminPermission::ALL)
    }

    fn admin_role() -> Role {
        Role::new("Administrator", ADMIN_SLUG)
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let h = harness(vec![], vec![], vec![]);

        let resp = create_role(
            State(h.state.clone()),
            full_auth(),
            Json(CreateRoleRequest {
                name: "Editor".to_string(),
                slug: "editor".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.0.message.as_deref(), Some("New Role Added Successfully"));

        let list = list_roles(State(h.state.clone()), full_auth()).await.unwrap();
        assert_eq!(list.0.total, 1);
        assert_eq!(list.0.roles[0].slug, "editor");
        assert!(list.0.roles[0].status);
        assert_eq!(h.invalidator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_leaves_store_unchanged() {
        let h = harness(vec![Role::new("Editor", "editor")], vec![], vec![]);

        let err = create_role(
            State(h.state.clone()),
            full_auth(),
            Json(CreateRoleRequest {
                name: "Editor Two".to_string(),
                slug: "editor".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err.error, AdminError::Duplicate { .. }));
        assert!(err.submitted.is_some());
        assert_eq!(h.role_store.snapshot().len(), 1);
        assert_eq!(h.invalidator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let h = harness(vec![], vec![], vec![]);

        let err = create_role(
            State(h.state.clone()),
            full_auth(),
            Json(CreateRoleRequest {
                name: "  ".to_string(),
                slug: "editor".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err.error, AdminError::Validation { .. }));
        assert!(h.role_store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_permission_gate_rejects_missing_permission() {
        let h = harness(vec![], vec![], vec![]);

        let err = list_roles(State(h.state.clone()), auth_with(&[AdminPermission::CreateRole]))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Forbidden { .. }));

        let err = delete_role(
            State(h.state.clone()),
            auth_with(&[AdminPermission::ListRole]),
            Path("any".to_string()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AdminError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_edit_form_rejects_admin_role() {
        let admin = admin_role();
        let id = admin.id.clone();
        let h = harness(vec![admin], vec![], vec![]);

        let err = edit_role_form(State(h.state.clone()), full_auth(), Path(id))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot Edit Admin Role");
    }

    #[tokio::test]
    async fn test_update_role_changes_name_and_slug() {
        let role = Role::new("Editor", "editor");
        let id = role.id.clone();
        let h = harness(vec![role], vec![], vec![]);

        let resp = update_role(
            State(h.state.clone()),
            full_auth(),
            Path(id.clone()),
            Json(UpdateRoleRequest {
                name: "Content Editor".to_string(),
                slug: "content-editor".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            resp.0.message.as_deref(),
            Some("Role Detail Updated Successfully")
        );

        let stored = h.role_store.snapshot();
        assert_eq!(stored[0].name, "Content Editor");
        assert_eq!(stored[0].slug, "content-editor");
        assert_eq!(h.invalidator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_role_is_not_found_with_input_echoed() {
        let h = harness(vec![], vec![], vec![]);

        let err = update_role(
            State(h.state.clone()),
            full_auth(),
            Path("missing".to_string()),
            Json(UpdateRoleRequest {
                name: "Editor".to_string(),
                slug: "editor".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err.error, AdminError::NotFound { .. }));

        // The failed submission travels back with the error body
        let submitted = err.submitted.expect("submitted input echoed");
        assert_eq!(submitted["name"], "Editor");
        assert_eq!(submitted["slug"], "editor");
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_status() {
        let role = Role::new("Editor", "editor");
        let id = role.id.clone();
        let h = harness(vec![role], vec![], vec![]);

        toggle_role_status(State(h.state.clone()), full_auth(), Path(id.clone()))
            .await
            .unwrap();
        assert!(!h.role_store.snapshot()[0].status);

        toggle_role_status(State(h.state.clone()), full_auth(), Path(id))
            .await
            .unwrap();
        assert!(h.role_store.snapshot()[0].status);

        // Status toggling leaves the permission cache alone
        assert_eq!(h.invalidator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_admin_role_rejected() {
        let admin = admin_role();
        let id = admin.id.clone();
        let h = harness(vec![admin], vec![], vec![]);

        let err = delete_role(State(h.state.clone()), full_auth(), Path(id))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot Delete Admin Role");
        assert_eq!(h.role_store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_assigned_role_rejected() {
        let role = Role::new("Editor", "editor");
        let id = role.id.clone();
        let user = User::new("Jane", "jane@example.com").with_role(&id);
        let h = harness(vec![role], vec![user], vec![]);

        let err = delete_role(State(h.state.clone()), full_auth(), Path(id))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot Delete Assigned Role");
        assert_eq!(h.role_store.snapshot().len(), 1);
        assert_eq!(h.invalidator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_unassigned_role_succeeds() {
        let role = Role::new("Editor", "editor");
        let id = role.id.clone();
        let h = harness(vec![role], vec![], vec![]);

        let resp = delete_role(State(h.state.clone()), full_auth(), Path(id))
            .await
            .unwrap();
        assert_eq!(
            resp.0.message.as_deref(),
            Some("Role Detail Deleted Successfully")
        );
        assert!(h.role_store.snapshot().is_empty());
        assert_eq!(h.invalidator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_permission_form_rejects_admin_role() {
        let admin = admin_role();
        let id = admin.id.clone();
        let h = harness(vec![admin], vec![], vec![]);

        let err = permission_form(State(h.state.clone()), full_auth(), Path(id))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Admin Role Is Always Assigned With All Permission"
        );
    }

    #[tokio::test]
    async fn test_permission_form_payload() {
        let role = Role::new("Editor", "editor").with_permission_ids(["p1"]);
        let id = role.id.clone();
        let group = PermissionGroup::new("Role Management")
            .with_permission(Permission::new("p1", "list_role"))
            .with_permission(Permission::new("p2", "create_role"));
        let h = harness(vec![admin_role(), role], vec![], vec![group]);

        let resp = permission_form(State(h.state.clone()), full_auth(), Path(id))
            .await
            .unwrap();

        assert!(resp.0.is_edit);
        assert_eq!(resp.0.groups.len(), 1);
        assert_eq!(resp.0.groups[0].permissions.len(), 2);
        // The assignable roles list leaves the admin role out
        assert_eq!(resp.0.roles.len(), 1);
        assert_eq!(resp.0.roles[0].slug, "editor");
    }

    #[tokio::test]
    async fn test_assign_permissions_replaces_set() {
        let role = Role::new("Editor", "editor");
        let id = role.id.clone();
        let h = harness(vec![role], vec![], vec![]);

        assign_permissions(
            State(h.state.clone()),
            full_auth(),
            Path(id.clone()),
            Json(AssignPermissionsRequest {
                permission_ids: vec!["1".into(), "2".into(), "3".into()],
            }),
        )
        .await
        .unwrap();
        assert_eq!(h.role_store.snapshot()[0].permission_ids, vec!["1", "2", "3"]);

        let resp = assign_permissions(
            State(h.state.clone()),
            full_auth(),
            Path(id),
            Json(AssignPermissionsRequest {
                permission_ids: vec!["2".into()],
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            resp.0.message.as_deref(),
            Some("Permission Updated To Role Successfully")
        );
        assert_eq!(h.role_store.snapshot()[0].permission_ids, vec!["2"]);

        // Assignment does not touch the permission cache
        assert_eq!(h.invalidator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_assign_empty_list_clears_permissions() {
        let role = Role::new("Editor", "editor").with_permission_ids(["1", "2"]);
        let id = role.id.clone();
        let h = harness(vec![role], vec![], vec![]);

        assign_permissions(
            State(h.state.clone()),
            full_auth(),
            Path(id),
            Json(AssignPermissionsRequest {
                permission_ids: vec![],
            }),
        )
        .await
        .unwrap();

        assert!(h.role_store.snapshot()[0].permission_ids.is_empty());
    }

    #[tokio::test]
    async fn test_assign_permissions_missing_role() {
        let h = harness(vec![], vec![], vec![]);

        let err = assign_permissions(
            State(h.state.clone()),
            full_auth(),
            Path("missing".to_string()),
            Json(AssignPermissionsRequest {
                permission_ids: vec!["1".into()],
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AdminError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_admin_caller_passes_every_gate() {
        let h = harness(vec![], vec![], vec![]);
        let admin_caller = Authenticated(AuthContext {
            principal_id: "root".to_string(),
            name: "Root".to_string(),
            role_slug: ADMIN_SLUG.to_string(),
            permissions: HashSet::new(),
        });

        let list = list_roles(State(h.state.clone()), admin_caller).await.unwrap();
        assert_eq!(list.0.total, 0);
    }
}
