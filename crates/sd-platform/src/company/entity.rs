//! Company Entity
//!
//! The single company record created by the seed initializer.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    pub phone: String,

    pub email: String,

    pub owner_name: String,

    pub address: String,

    #[serde(default)]
    pub logo: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        owner_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            owner_name: owner_name.into(),
            address: address.into(),
            logo: String::new(),
            created_at: Utc::now(),
        }
    }
}
