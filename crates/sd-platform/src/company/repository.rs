//! Company Repository

use mongodb::{Collection, Database, bson::doc};

use crate::company::entity::Company;
use crate::shared::error::Result;

pub struct CompanyRepository {
    collection: Collection<Company>,
}

impl CompanyRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("companies"),
        }
    }

    pub async fn insert(&self, company: &Company) -> Result<()> {
        self.collection.insert_one(company).await?;
        Ok(())
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Company>> {
        Ok(self.collection.find_one(doc! { "name": name }).await?)
    }
}
