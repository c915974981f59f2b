//! Role Aggregate
//!
//! Role CRUD, status toggling, and permission assignment.

pub mod api;
pub mod entity;
pub mod repository;

// Re-export main types
pub use api::{roles_router, RolesState};
pub use entity::{Role, ADMIN_SLUG};
pub use repository::{MongoRoleStore, RoleStore};
