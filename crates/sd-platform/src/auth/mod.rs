//! Authentication Aggregate
//!
//! JWT-based authentication for the admin API.

pub mod auth_service;

// Re-export main types
pub use auth_service::{AccessTokenClaims, AuthConfig, AuthService};
