//! MongoDB backend.
//!
//! One document per user in the configured collection:
//!
//! ```json
//! { "user_id": "u1", "entries": [ { "query": "...", "indices": "10, 11" } ] }
//! ```
//!
//! Appends are a single `find_one_and_update` with `$push` + `upsert` that
//! returns the updated document, so the next suffix is never computed on the
//! client and concurrent appends cannot overwrite each other.
//!
//! Documents written by the previous deployment are keyed by `"user id"`.
//! Reads match either key; the first append to such a document copies the
//! identifier to `user_id` so the upsert keeps a plain equality filter.

use std::time::Instant;

use mongodb::{
    Client, Collection, IndexModel,
    bson::{Document, doc},
    options::{ClientOptions, IndexOptions, ReturnDocument, ServerApi, ServerApiVersion},
};
use tracing::{debug, info};

use crate::{
    config::HistoryStoreConfig,
    errors::HistoryError,
    record::{ENTRIES_FIELD, HistoryEntry, LEGACY_USER_ID_FIELD, USER_ID_FIELD, UserQueryRecord},
    store::{HistoryStore, StoreFuture, require_user_id},
    window::RecentWindow,
};

const APP_NAME: &str = "keyword-backend";

/// History stored in a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoHistoryStore {
    client: Client,
    collection: Collection<Document>,
}

impl MongoHistoryStore {
    /// Builds a client for `cfg.uri` using the stable server API v1.
    ///
    /// The driver connects lazily; use [`HistoryStore::ping`] to verify
    /// connectivity.
    ///
    /// # Errors
    /// - [`HistoryError::Config`] if no URI is configured
    /// - [`HistoryError::Mongo`] if the URI cannot be parsed
    pub async fn connect(cfg: &HistoryStoreConfig) -> Result<Self, HistoryError> {
        let uri = cfg
            .mongodb_uri
            .as_deref()
            .ok_or_else(|| HistoryError::Config("MONGODB_URI is not set".into()))?;

        let mut opts = ClientOptions::parse(uri).await?;
        opts.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        if opts.app_name.is_none() {
            opts.app_name = Some(APP_NAME.to_string());
        }

        let client = Client::with_options(opts)?;
        let collection = client
            .database(&cfg.database)
            .collection::<Document>(&cfg.collection);

        info!(
            database = %cfg.database,
            collection = %cfg.collection,
            "MongoHistoryStore initialized"
        );

        Ok(Self { client, collection })
    }

    /// Creates the unique `user_id` index (no-op if it already exists).
    ///
    /// Legacy documents without `user_id` are left out of the index.
    pub async fn ensure_indexes(&self) -> Result<(), HistoryError> {
        let model = IndexModel::builder()
            .keys(doc! { USER_ID_FIELD: 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { USER_ID_FIELD: { "$exists": true } })
                    .build(),
            )
            .build();
        self.collection.create_index(model).await?;
        debug!(collection = %self.collection.name(), "user_id index ensured");
        Ok(())
    }

    async fn find(&self, user_id: &str) -> Result<Option<UserQueryRecord>, HistoryError> {
        self.collection
            .find_one(doc! {
                "$or": [ { USER_ID_FIELD: user_id }, { LEGACY_USER_ID_FIELD: user_id } ]
            })
            .await?
            .map(|d| UserQueryRecord::from_document(&d))
            .transpose()
    }

    /// Copies `"user id"` to `user_id` on a legacy document, if there is one.
    async fn adopt_legacy(&self, user_id: &str) -> Result<(), HistoryError> {
        let res = self
            .collection
            .update_one(
                doc! {
                    LEGACY_USER_ID_FIELD: user_id,
                    USER_ID_FIELD: { "$exists": false },
                },
                doc! { "$set": { USER_ID_FIELD: user_id } },
            )
            .await?;
        if res.modified_count > 0 {
            info!(user_id, "legacy history record adopted");
        }
        Ok(())
    }
}

impl HistoryStore for MongoHistoryStore {
    fn append<'a>(
        &'a self,
        user_id: &'a str,
        query: &'a str,
        indices: &'a [String],
    ) -> StoreFuture<'a, RecentWindow> {
        Box::pin(async move {
            let user_id = require_user_id(user_id)?;
            let started = Instant::now();
            let entry = HistoryEntry::new(query, indices);

            self.adopt_legacy(user_id).await?;
            let updated = self
                .collection
                .find_one_and_update(
                    doc! { USER_ID_FIELD: user_id },
                    doc! { "$push": { ENTRIES_FIELD: entry.to_document() } },
                )
                .upsert(true)
                .return_document(ReturnDocument::After)
                .await?
                .ok_or_else(|| HistoryError::Decode("upsert returned no document".into()))?;

            let record = UserQueryRecord::from_document(&updated)?;
            info!(
                user_id,
                suffix = record.len(),
                latency_ms = started.elapsed().as_millis(),
                "history entry appended"
            );
            Ok(record.recent())
        })
    }

    fn recent<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, RecentWindow> {
        Box::pin(async move {
            let user_id = require_user_id(user_id)?;
            Ok(self
                .find(user_id)
                .await?
                .map(|r| r.recent())
                .unwrap_or_default())
        })
    }

    fn record<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<UserQueryRecord>> {
        Box::pin(async move {
            let user_id = require_user_id(user_id)?;
            self.find(user_id).await
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.client
                .database("admin")
                .run_command(doc! { "ping": 1 })
                .await?;
            Ok(())
        })
    }
}

/// These run against a live server: set `MONGODB_URI` and pass `--ignored`.
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    async fn live_store(name: &str) -> Option<MongoHistoryStore> {
        let uri = std::env::var("MONGODB_URI").ok()?;
        let cfg = HistoryStoreConfig {
            mongodb_uri: Some(uri),
            database: "keyword_backend_test".into(),
            collection: format!("history_{name}_{}", std::process::id()),
            ..HistoryStoreConfig::default()
        };
        let store = MongoHistoryStore::connect(&cfg).await.unwrap();
        store.collection.drop().await.unwrap();
        store.ensure_indexes().await.unwrap();
        Some(store)
    }

    #[tokio::test]
    #[ignore = "requires MONGODB_URI"]
    async fn appends_roll_the_window() {
        let Some(store) = live_store("roll").await else {
            return;
        };

        let w = store
            .append("u1", "q1", &["10".into(), "11".into()])
            .await
            .unwrap();
        assert_eq!(w.query_1, "q1");
        assert_eq!(w.indices_1, "10, 11");
        assert_eq!(store.record("u1").await.unwrap().unwrap().len(), 1);

        for n in 2..=5 {
            store.append("u1", &format!("q{n}"), &[]).await.unwrap();
        }
        let w = store.recent("u1").await.unwrap();
        assert_eq!(
            [w.query_1.as_str(), w.query_2.as_str(), w.query_3.as_str()],
            ["q5", "q4", "q3"]
        );

        let rec = store.record("u1").await.unwrap().unwrap();
        for n in 1..=5 {
            assert_eq!(rec.entry(n).unwrap().query, format!("q{n}"));
        }

        store.collection.drop().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "requires MONGODB_URI"]
    async fn concurrent_appends_for_new_user_both_land() {
        let Some(store) = live_store("concurrent").await else {
            return;
        };
        let store = Arc::new(store);

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

        store.collection.drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires MONGODB_URI"]
    async fn legacy_record_is_read_and_extended() {
        let Some(store) = live_store("legacy").await else {
            return;
        };
        store
            .collection
            .insert_one(doc! { "user id": "u1", "query_1": "gothic", "indices_1": "10, 11" })
            .await
            .unwrap();

        let w = store.recent("u1").await.unwrap();
        assert_eq!(w.query_1, "gothic");
        assert_eq!(w.indices_1, "10, 11");

        let w = store.append("u1", "foggy moors", &[]).await.unwrap();
        assert_eq!(w.query_1, "foggy moors");
        assert_eq!(w.query_2, "gothic");

        assert_eq!(store.collection.count_documents(doc! {}).await.unwrap(), 1);

        store.collection.drop().await.unwrap();
    }
}
