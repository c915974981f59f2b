//! User Aggregate
//!
//! Users reference roles; the role module consults this aggregate before
//! deleting a role.

pub mod entity;
pub mod repository;

// Re-export main types
pub use entity::User;
pub use repository::{MongoUserStore, UserStore};
