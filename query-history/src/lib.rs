//! Per-user query history with a rolling window of recent entries.
//!
//! Public API:
//! - [`HistoryStore`]: append / recent / record / ping
//! - [`MongoHistoryStore`], [`MemoryHistoryStore`]: backends
//! - [`open_store`]: build the backend selected by [`HistoryStoreConfig`]
//! - [`RecentWindow`]: the three most recent `(query, indices)` pairs

pub mod config;
pub mod errors;
pub mod memory;
pub mod mongo;
pub mod record;
pub mod store;
pub mod window;

use std::sync::Arc;

pub use config::{HistoryBackend, HistoryStoreConfig};
pub use errors::HistoryError;
pub use memory::MemoryHistoryStore;
pub use mongo::MongoHistoryStore;
pub use record::{HistoryEntry, UserQueryRecord, join_indices};
pub use store::{HistoryStore, StoreFuture};
pub use window::{RecentWindow, WINDOW_SIZE};

use tracing::warn;

/// Builds the configured backend.
///
/// For MongoDB this also tries to create the unique `user_id` index; a
/// failure there is only logged, like a failed startup ping.
pub async fn open_store(cfg: &HistoryStoreConfig) -> Result<Arc<dyn HistoryStore>, HistoryError> {
    cfg.validate()?;
    match cfg.backend {
        HistoryBackend::Memory => Ok(Arc::new(MemoryHistoryStore::new())),
        HistoryBackend::Mongo => {
            let store = MongoHistoryStore::connect(cfg).await?;
            if let Err(e) = store.ensure_indexes().await {
                warn!(error = %e, "could not ensure user_id index");
            }
            Ok(Arc::new(store))
        }
    }
}
