//! Permission Aggregate
//!
//! Grouped permission catalog read by the role assignment screen.

pub mod entity;
pub mod repository;

// Re-export main types
pub use entity::{Permission, PermissionGroup};
pub use repository::{MongoPermissionGroupStore, PermissionGroupStore};
