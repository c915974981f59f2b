//! Staffdesk Platform
//!
//! Role-and-permission administration platform providing:
//! - Role CRUD with a protected built-in admin role
//! - Grouped permission catalog and full-replace assignment
//! - Permission-gated REST endpoints with JWT authentication
//! - Process-wide permission cache with mutation-driven invalidation
//! - Development data seeding
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Data access
//! - `api` - REST endpoints (where applicable)

// Core aggregates
pub mod company;
pub mod permission;
pub mod role;
pub mod user;

// Authentication & authorization
pub mod auth;

// Shared infrastructure
pub mod shared;

// Cross-cutting concerns
pub mod seed;

// Re-export common types from shared
pub use shared::authorization_service::{AdminPermission, AuthContext, AuthorizationService};
pub use shared::cache::{CacheInvalidator, PermissionCache};
pub use shared::error::{AdminError, Result};
pub use shared::middleware::{AppState, AuthLayer, Authenticated};

// Re-export main entity types for convenience
pub use auth::{AccessTokenClaims, AuthConfig, AuthService};
pub use company::{Company, CompanyRepository};
pub use permission::{MongoPermissionGroupStore, Permission, PermissionGroup, PermissionGroupStore};
pub use role::{roles_router, MongoRoleStore, Role, RoleStore, RolesState, ADMIN_SLUG};
pub use seed::DevDataSeeder;
pub use user::{MongoUserStore, User, UserStore};
