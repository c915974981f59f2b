//! Role Store
//!
//! Persistence contract for roles plus the MongoDB implementation.
//!
//! Every mutating method is a single MongoDB document command, so each
//! call commits or fails as a whole; a failed call leaves store state
//! exactly as it was.

use async_trait::async_trait;
use mongodb::{Collection, Database, bson::doc};
use futures::TryStreamExt;
use chrono::Utc;

use crate::role::entity::{Role, ADMIN_SLUG};
use crate::shared::error::{AdminError, Result};

/// Persistence abstraction over roles.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn insert(&self, role: &Role) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Role>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Role>>;
    async fn find_all(&self) -> Result<Vec<Role>>;
    async fn find_all_except_admin(&self) -> Result<Vec<Role>>;
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;
    async fn update(&self, role: &Role) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<bool>;
    /// Flip the active flag in one atomic round-trip.
    async fn toggle_status(&self, id: &str) -> Result<()>;
    /// Full-replace permission assignment: the new set entirely
    /// supersedes the old; an empty slice clears all grants.
    async fn sync_permissions(&self, id: &str, permission_ids: &[String]) -> Result<()>;
}

pub struct MongoRoleStore {
    collection: Collection<Role>,
}

impl MongoRoleStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("roles"),
        }
    }
}

#[async_trait]
impl RoleStore for MongoRoleStore {
    async fn insert(&self, role: &Role) -> Result<()> {
        self.collection.insert_one(role).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Role>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Role>> {
        Ok(self.collection.find_one(doc! { "slug": slug }).await?)
    }

    async fn find_all(&self) -> Result<Vec<Role>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_all_except_admin(&self) -> Result<Vec<Role>> {
        let cursor = self.collection
            .find(doc! { "slug": { "$ne": ADMIN_SLUG } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let count = self.collection
            .count_documents(doc! { "slug": slug })
            .await?;
        Ok(count > 0)
    }

    async fn update(&self, role: &Role) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &role.id }, role)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn toggle_status(&self, id: &str) -> Result<()> {
        // Pipeline update: the flip happens server-side, one atomic command.
        let result = self.collection
            .update_one(
                doc! { "_id": id },
                vec![doc! { "$set": {
                    "status": { "$not": "$status" },
                    "updatedAt": "$$NOW",
                } }],
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AdminError::not_found("Role", id));
        }
        Ok(())
    }

    async fn sync_permissions(&self, id: &str, permission_ids: &[String]) -> Result<()> {
        let updated_at = bson::DateTime::from_chrono(Utc::now());
        let result = self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "permissionIds": permission_ids,
                    "updatedAt": updated_at,
                } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AdminError::not_found("Role", id));
        }
        Ok(())
    }
}
