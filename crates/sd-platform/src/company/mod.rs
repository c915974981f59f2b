//! Company Aggregate
//!
//! Company profile record, populated by the development seeder.

pub mod entity;
pub mod repository;

// Re-export main types
pub use entity::Company;
pub use repository::CompanyRepository;
