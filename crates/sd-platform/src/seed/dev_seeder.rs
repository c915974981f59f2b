//! Development Data Seeder
//!
//! Seeds initial data on application startup: the company profile, the
//! protected admin role, and the permission group catalog. Every step is
//! create-if-not-exists, so repeated startups are harmless.

use mongodb::Database;
use tracing::info;

use crate::company::{Company, CompanyRepository};
use crate::permission::{MongoPermissionGroupStore, Permission, PermissionGroup, PermissionGroupStore};
use crate::role::{MongoRoleStore, Role, RoleStore, ADMIN_SLUG};
use crate::shared::authorization_service::AdminPermission;

const COMPANY_NAME: &str = "Pandu Talenta";

/// Development data seeder
pub struct DevDataSeeder {
    db: Database,
}

impl DevDataSeeder {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Seed all development data
    pub async fn seed(&self) -> Result<(), Box<dyn std::error::Error>> {
        info!("=== DEV DATA SEEDER ===");
        info!("Seeding development data...");

        self.seed_company().await?;
        self.seed_admin_role().await?;
        self.seed_permission_groups().await?;

        info!("Development data seeded successfully!");
        info!("=======================");

        Ok(())
    }

    async fn seed_company(&self) -> Result<(), Box<dyn std::error::Error>> {
        let repo = CompanyRepository::new(&self.db);

        if repo.find_by_name(COMPANY_NAME).await?.is_some() {
            return Ok(());
        }

        let company = Company::new(
            COMPANY_NAME,
            "6281241003047",
            "dev@sidepe.com",
            "Pandu Talenta Digital",
            "Makassar",
        );
        repo.insert(&company).await?;
        info!("Created company: {}", COMPANY_NAME);

        Ok(())
    }

    /// The admin role row must always exist; it is never editable and is
    /// implicitly granted every permission.
    async fn seed_admin_role(&self) -> Result<(), Box<dyn std::error::Error>> {
        let store = MongoRoleStore::new(&self.db);

        if store.find_by_slug(ADMIN_SLUG).await?.is_some() {
            return Ok(());
        }

        let role = Role::new("Administrator", ADMIN_SLUG);
        store.insert(&role).await?;
        info!("Created role: Administrator ({})", ADMIN_SLUG);

        Ok(())
    }

    async fn seed_permission_groups(&self) -> Result<(), Box<dyn std::error::Error>> {
        let store = MongoPermissionGroupStore::new(&self.db);

        if !store.find_all_with_permissions().await?.is_empty() {
            return Ok(());
        }

        let role_management = PermissionGroup::new("Role Management")
            .with_permission(Permission::new("1", AdminPermission::ListRole.as_str()))
            .with_permission(Permission::new("2", AdminPermission::CreateRole.as_str()))
            .with_permission(Permission::new("3", AdminPermission::EditRole.as_str()))
            .with_permission(Permission::new("4", AdminPermission::DeleteRole.as_str()));

        let permission_management = PermissionGroup::new("Permission Management")
            .with_permission(Permission::new("5", AdminPermission::ListPermission.as_str()))
            .with_permission(Permission::new(
                "6",
                AdminPermission::AssignPermission.as_str(),
            ));

        store.collection().insert_one(&role_management).await?;
        store.collection().insert_one(&permission_management).await?;
        info!("Created permission groups: Role Management, Permission Management");

        Ok(())
    }
}
