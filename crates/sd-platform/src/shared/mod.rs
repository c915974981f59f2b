//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod api_common;
pub mod cache;
pub mod error;
pub mod middleware;

// Services
pub mod authorization_service;

// Re-export commonly used items
pub use api_common::{ApiError, SuccessResponse};
pub use authorization_service::{AdminPermission, AuthContext, AuthorizationService};
pub use cache::{CacheInvalidator, PermissionCache};
pub use error::{AdminError, Result};
pub use middleware::{AppState, AuthLayer, Authenticated};
