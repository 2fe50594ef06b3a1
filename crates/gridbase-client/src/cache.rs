//! In-memory cache for record list results.
//!
//! Mutations through the record client invalidate every cached list for
//! the affected table before they return, so a read issued after an
//! awaited mutation never observes the stale list.

use gridbase_core::Record;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache key scoped to one table and one query encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub table: i64,
    pub query: String,
}

impl ListKey {
    pub fn new(table: i64, query: impl Into<String>) -> Self {
        Self {
            table,
            query: query.into(),
        }
    }
}

/// Cached record lists, keyed by table and query.
#[derive(Clone, Default)]
pub struct ListCache {
    entries: Arc<RwLock<HashMap<ListKey, Arc<Vec<Record>>>>>,
}

impl ListCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a cached list for a key.
    pub async fn get(&self, key: &ListKey) -> Option<Arc<Vec<Record>>> {
        let entries = self.entries.read().await;
        entries.get(key).cloned()
    }

    /// Inserts a list result.
    pub async fn insert(&self, key: ListKey, records: Vec<Record>) {
        let mut entries = self.entries.write().await;
        entries.insert(key, Arc::new(records));
    }

    /// Drops every cached list for a table. Called by mutations before
    /// they return.
    pub async fn invalidate_table(&self, table: i64) {
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| key.table != table);
        tracing::debug!(table, "record list cache invalidated");
    }

    /// Clears the whole cache.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, table: i64) -> Record {
        Record {
            id,
            table,
            data: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = ListCache::new();
        let key = ListKey::new(7, "sort=Name:asc");
        assert!(cache.get(&key).await.is_none());

        cache.insert(key.clone(), vec![record(1, 7)]).await;
        assert_eq!(cache.get(&key).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_is_per_table() {
        let cache = ListCache::new();
        cache.insert(ListKey::new(7, ""), vec![record(1, 7)]).await;
        cache
            .insert(ListKey::new(7, "search=x"), vec![record(1, 7)])
            .await;
        cache.insert(ListKey::new(8, ""), vec![record(2, 8)]).await;

        cache.invalidate_table(7).await;

        assert!(cache.get(&ListKey::new(7, "")).await.is_none());
        assert!(cache.get(&ListKey::new(7, "search=x")).await.is_none());
        assert!(cache.get(&ListKey::new(8, "")).await.is_some());
    }
}
