//! Process-Wide Cache
//!
//! The cache-invalidation interface the role service depends on, and the
//! production implementation: an in-process cache of resolved
//! role -> permission sets used by the authorization layer.
//!
//! Invalidation is blunt: every successful role mutation drops the whole
//! cache, not just role-related entries. It is also not transactional
//! with the store commit, so a brief staleness window exists between a
//! commit and the invalidation taking effect.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::shared::authorization_service::AdminPermission;
use crate::shared::error::Result;

/// Cache invalidation the service layer calls after successful mutations.
///
/// Injected as a dependency so tests can substitute a recording double.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Drop every cached entry.
    async fn invalidate_all(&self) -> Result<()>;
}

/// In-process cache of resolved role permission sets, keyed by role slug.
#[derive(Default)]
pub struct PermissionCache {
    entries: RwLock<HashMap<String, HashSet<AdminPermission>>>,
}

impl PermissionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role_slug: &str) -> Option<HashSet<AdminPermission>> {
        self.entries
            .read()
            .ok()
            .and_then(|map| map.get(role_slug).cloned())
    }

    pub fn put(&self, role_slug: impl Into<String>, permissions: HashSet<AdminPermission>) {
        if let Ok(mut map) = self.entries.write() {
            map.insert(role_slug.into(), permissions);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheInvalidator for PermissionCache {
    async fn invalidate_all(&self) -> Result<()> {
        if let Ok(mut map) = self.entries.write() {
            map.clear();
        }
        Ok(())
    }
}

/// Test double that records invalidation calls instead of caching anything.
#[cfg(test)]
pub struct RecordingInvalidator {
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl RecordingInvalidator {
    pub fn new() -> Self {
        Self {
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl CacheInvalidator for RecordingInvalidator {
    async fn invalidate_all(&self) -> Result<()> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalidate_all_clears_entries() {
        let cache = PermissionCache::new();
        cache.put("editor", [AdminPermission::ListRole].into_iter().collect());
        cache.put("viewer", [AdminPermission::ListPermission].into_iter().collect());
        assert_eq!(cache.len(), 2);

        cache.invalidate_all().await.unwrap();
        assert!(cache.is_empty());
        assert!(cache.get("editor").is_none());
    }

    #[tokio::test]
    async fn test_recording_invalidator_counts_calls() {
        let recorder = RecordingInvalidator::new();
        recorder.invalidate_all().await.unwrap();
        recorder.invalidate_all().await.unwrap();
        assert_eq!(recorder.call_count(), 2);
    }
}
