//! Role Entity
//!
//! A role is a slug-identified bundle of permissions assignable to users.
//! Exactly one role carries the `admin` slug; it can never be edited or
//! deleted and is implicitly granted every permission.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

/// Slug of the protected built-in role.
pub const ADMIN_SLUG: &str = "admin";

fn default_status() -> bool {
    true
}

/// Role definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// UUID as string
    #[serde(rename = "_id")]
    pub id: String,

    /// Human-readable display name
    pub name: String,

    /// Stable unique identifier (e.g., "admin", "editor")
    pub slug: String,

    /// Active/inactive flag (new roles default to active)
    #[serde(default = "default_status")]
    pub status: bool,

    /// Granted permission IDs (full set replaced atomically on sync)
    #[serde(default)]
    pub permission_ids: Vec<String>,

    /// Audit fields
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            slug: slug.into(),
            status: true,
            permission_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_permission_ids(mut self, permission_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.permission_ids = permission_ids.into_iter().map(Into::into).collect();
        self
    }

    /// The admin role is protected: never edited, never deleted, always
    /// granted every permission.
    pub fn is_admin(&self) -> bool {
        self.slug == ADMIN_SLUG
    }

    /// Whether this role already carries any granted permissions.
    /// Distinguishes "create" vs "edit" presentation of the permission form.
    pub fn has_permissions(&self) -> bool {
        !self.permission_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_role_defaults_active() {
        let role = Role::new("Editor", "editor");
        assert!(role.status);
        assert!(role.permission_ids.is_empty());
        assert!(!role.is_admin());
    }

    #[test]
    fn test_admin_slug_detection() {
        let role = Role::new("Administrator", ADMIN_SLUG);
        assert!(role.is_admin());
    }

    #[test]
    fn test_has_permissions() {
        let role = Role::new("Editor", "editor").with_permission_ids(["1", "2"]);
        assert!(role.has_permissions());
        assert_eq!(role.permission_ids, vec!["1", "2"]);
    }

    #[test]
    fn test_bson_round_trip() {
        let role = Role::new("Editor", "editor").with_permission_ids(["p1"]);
        let doc = bson::to_document(&role).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), role.id);
        let back: Role = bson::from_document(doc).unwrap();
        assert_eq!(back.slug, "editor");
        assert!(back.status);
    }
}
