//! In-process backend used by tests and local runs (`HISTORY_BACKEND=memory`).

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    record::{HistoryEntry, UserQueryRecord},
    store::{HistoryStore, StoreFuture, require_user_id},
    window::RecentWindow,
};

/// History kept in a map guarded by an async `RwLock`.
///
/// Appends hold the write lock for the whole read-modify-write, so
/// concurrent appends for one user never share a suffix.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: RwLock<HashMap<String, UserQueryRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a record.
    pub async fn user_count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append<'a>(
        &'a self,
        user_id: &'a str,
        query: &'a str,
        indices: &'a [String],
    ) -> StoreFuture<'a, RecentWindow> {
        Box::pin(async move {
            let user_id = require_user_id(user_id)?;

            let mut records = self.records.write().await;
            let record = records
                .entry(user_id.to_string())
                .or_insert_with(|| UserQueryRecord::new(user_id));
            let suffix = record.push(HistoryEntry::new(query, indices));

            debug!(user_id, suffix, "history entry appended (memory)");
            Ok(record.recent())
        })
    }

    fn recent<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, RecentWindow> {
        Box::pin(async move {
            let user_id = require_user_id(user_id)?;
            Ok(self
                .records
                .read()
                .await
                .get(user_id)
                .map(UserQueryRecord::recent)
                .unwrap_or_default())
        })
    }

    fn record<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<UserQueryRecord>> {
        Box::pin(async move {
            let user_id = require_user_id(user_id)?;
            Ok(self.records.read().await.get(user_id).cloned())
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::errors::HistoryError;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn first_append_creates_suffix_one() {
        let store = MemoryHistoryStore::new();
        let w = store
            .append("u1", "gothic atmospheric mansion", &ids(&["10", "11"]))
            .await
            .unwrap();

        assert_eq!(w.query_1, "gothic atmospheric mansion");
        assert_eq!(w.indices_1, "10, 11");
        assert_eq!(w.query_2, "");
        assert_eq!(w.indices_2, "");
        assert_eq!(w.query_3, "");
        assert_eq!(w.indices_3, "");

        let rec = store.record("u1").await.unwrap().unwrap();
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.entry(1).unwrap().indices, "10, 11");
    }

    #[tokio::test]
    async fn suffixes_follow_call_order_and_window_rolls() {
        let store = MemoryHistoryStore::new();
        for n in 1..=5 {
            let w = store
                .append("u1", &format!("q{n}"), &ids(&[&n.to_string()]))
                .await
                .unwrap();
            assert_eq!(w.query_1, format!("q{n}"));
        }

        let rec = store.record("u1").await.unwrap().unwrap();
        for n in 1..=5 {
            assert_eq!(rec.entry(n).unwrap().query, format!("q{n}"));
        }

        let w = store.recent("u1").await.unwrap();
        assert_eq!(
            [w.query_1.as_str(), w.query_2.as_str(), w.query_3.as_str()],
            ["q5", "q4", "q3"]
        );
    }

    #[tokio::test]
    async fn recent_for_unknown_user_is_empty() {
        let store = MemoryHistoryStore::new();
        assert!(store.recent("nobody").await.unwrap().is_empty());
        assert!(store.record("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_user_id_leaves_store_untouched() {
        let store = MemoryHistoryStore::new();
        let err = store.append("  ", "q", &ids(&["1"])).await.unwrap_err();
        assert!(matches!(err, HistoryError::MissingUserId));
        assert_eq!(store.user_count().await, 0);

        assert!(matches!(
            store.recent("").await,
            Err(HistoryError::MissingUserId)
        ));
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = MemoryHistoryStore::new();
        store.append("a", "alpha", &[]).await.unwrap();
        store.append("b", "beta", &[]).await.unwrap();

        assert_eq!(store.recent("a").await.unwrap().query_1, "alpha");
        assert_eq!(store.recent("b").await.unwrap().query_1, "beta");
        assert_eq!(store.user_count().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_for_new_user_are_not_lost() {
        let store = Arc::new(MemoryHistoryStore::new());

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.append("u1", "first", &[]).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.append("u1", "second", &[]).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let rec = store.record("u1").await.unwrap().unwrap();
        assert_eq!(rec.len(), 2);
        let mut queries: Vec<_> = rec.entries.iter().map(|e| e.query.clone()).collect();
        queries.sort();
        assert_eq!(queries, ["first", "second"]);
    }
}
