//! Seed Module
//!
//! Startup data seeding for development environments.

pub mod dev_seeder;

pub use dev_seeder::DevDataSeeder;
