//! [`ResponseCache`]: in-memory tag-aware store for dispatcher responses.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use common::ResponseContent;
use tokio::sync::RwLock;

/// One cached response plus the tags it can be purged by.
#[derive(Debug, Clone)]
struct CacheEntry {
    content: ResponseContent,
    tags: HashSet<String>,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Reverse index: tag → keys of entries carrying it.
    tag_index: HashMap<String, HashSet<String>>,
}

/// Shared, tag-aware response cache.
///
/// Wraps an `Arc<RwLock<_>>` so request handlers take a short read lock on
/// the hot path while writers (cache fills, tag purges) hold the write lock
/// only for single-map operations. Two concurrent misses on the same key may
/// both execute and both write; the second write wins, which is the intended
/// coalescing behaviour for identical requests.
#[derive(Clone, Debug, Default)]
pub struct ResponseCache {
    inner: Arc<RwLock<CacheInner>>,
}

impl ResponseCache {
    /// Create a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently cached.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Look up a cached response by its composite key.
    pub async fn get(&self, key: &str) -> Option<ResponseContent> {
        self.inner
            .read()
            .await
            .entries
            .get(key)
            .map(|e| e.content.clone())
    }

    /// Store `content` under `key`, replacing any previous entry and
    /// re-indexing its tags.
    pub async fn put(
        &self,
        key: impl Into<String>,
        content: ResponseContent,
        tags: impl IntoIterator<Item = String>,
    ) {
        let key = key.into();
        let tags: HashSet<String> = tags.into_iter().collect();

        let mut inner = self.inner.write().await;
        if let Some(old) = inner.entries.remove(&key) {
            unindex(&mut inner, &key, &old.tags);
        }
        for tag in &tags {
            inner
                .tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        inner.entries.insert(key, CacheEntry { content, tags });
    }

    /// Purge every entry carrying `tag`. Returns the number of entries removed.
    pub async fn invalidate_tag(&self, tag: &str) -> usize {
        let mut inner = self.inner.write().await;
        let Some(keys) = inner.tag_index.remove(tag) else {
            return 0;
        };
        let mut removed = 0;
        for key in keys {
            if let Some(entry) = inner.entries.remove(&key) {
                unindex(&mut inner, &key, &entry.tags);
                removed += 1;
            }
        }
        removed
    }
}

/// Remove `key` from the index sets of all `tags`, dropping empty sets.
fn unindex(inner: &mut CacheInner, key: &str, tags: &HashSet<String>) {
    for tag in tags {
        if let Some(keys) = inner.tag_index.get_mut(tag) {
            keys.remove(key);
            if keys.is_empty() {
                inner.tag_index.remove(tag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(marker: &str) -> ResponseContent {
        ResponseContent::success(json!({ "marker": marker }))
    }

    #[tokio::test]
    async fn initially_empty() {
        let cache = ResponseCache::new();
        assert_eq!(cache.len().await, 0);
        assert!(cache.get("default/init/{}").await.is_none());
    }

    #[tokio::test]
    async fn put_and_get() {
        let cache = ResponseCache::new();
        cache
            .put("default/init/{}", content("a"), vec!["agoraRestEndpoint".into()])
            .await;
        let hit = cache.get("default/init/{}").await.unwrap();
        assert_eq!(hit.data["marker"], "a");
    }

    #[tokio::test]
    async fn put_replaces_previous_entry() {
        let cache = ResponseCache::new();
        cache.put("k", content("old"), vec!["t1".into()]).await;
        cache.put("k", content("new"), vec!["t2".into()]).await;
        assert_eq!(cache.get("k").await.unwrap().data["marker"], "new");
        // The stale tag no longer reaches the entry.
        assert_eq!(cache.invalidate_tag("t1").await, 0);
        assert_eq!(cache.invalidate_tag("t2").await, 1);
    }

    #[tokio::test]
    async fn invalidate_tag_removes_only_tagged_entries() {
        let cache = ResponseCache::new();
        cache
            .put("a", content("a"), vec!["node:comments:42".into(), "node:42".into()])
            .await;
        cache.put("b", content("b"), vec!["node_list".into()]).await;

        assert_eq!(cache.invalidate_tag("node:comments:42").await, 1);
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_some());
    }

    #[tokio::test]
    async fn invalidation_scrubs_sibling_tags() {
        let cache = ResponseCache::new();
        cache
            .put("a", content("a"), vec!["t1".into(), "t2".into()])
            .await;
        assert_eq!(cache.invalidate_tag("t1").await, 1);
        // The entry is gone; its sibling tag must not report a phantom purge.
        assert_eq!(cache.invalidate_tag("t2").await, 0);
    }

    #[tokio::test]
    async fn invalidating_unknown_tag_is_noop() {
        let cache = ResponseCache::new();
        cache.put("a", content("a"), vec!["t1".into()]).await;
        assert_eq!(cache.invalidate_tag("unrelated").await, 0);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn tag_shared_across_entries_purges_all() {
        let cache = ResponseCache::new();
        cache.put("a", content("a"), vec!["node_list".into()]).await;
        cache.put("b", content("b"), vec!["node_list".into()]).await;
        assert_eq!(cache.invalidate_tag("node_list").await, 2);
        assert_eq!(cache.len().await, 0);
    }
}
