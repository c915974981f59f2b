//! User Store

use async_trait::async_trait;
use mongodb::{Collection, Database, bson::doc};

use crate::user::entity::User;
use crate::shared::error::Result;

/// Persistence abstraction answering "does any user currently hold role X?"
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_any_by_role(&self, role_id: &str) -> Result<Option<User>>;
}

pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_any_by_role(&self, role_id: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "roleId": role_id }).await?)
    }
}
