//! Permission Group Store

use async_trait::async_trait;
use mongodb::{Collection, Database, bson::doc};
use futures::TryStreamExt;

use crate::permission::entity::PermissionGroup;
use crate::shared::error::Result;

/// Read-only persistence abstraction over grouped permission definitions.
#[async_trait]
pub trait PermissionGroupStore: Send + Sync {
    /// All permission groups with their nested permission details.
    async fn find_all_with_permissions(&self) -> Result<Vec<PermissionGroup>>;
}

pub struct MongoPermissionGroupStore {
    collection: Collection<PermissionGroup>,
}

impl MongoPermissionGroupStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("permission_groups"),
        }
    }

    pub fn collection(&self) -> &Collection<PermissionGroup> {
        &self.collection
    }
}

#[async_trait]
impl PermissionGroupStore for MongoPermissionGroupStore {
    async fn find_all_with_permissions(&self) -> Result<Vec<PermissionGroup>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}
