//! Storage interface shared by the MongoDB and in-memory backends.

use std::{future::Future, pin::Pin};

use crate::{errors::HistoryError, record::UserQueryRecord, window::RecentWindow};

/// Boxed future returned by [`HistoryStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, HistoryError>> + Send + 'a>>;

/// Per-user query history with append-only semantics.
///
/// Implement this trait to plug in another document store. Implementations
/// must make `append` atomic per user: two concurrent appends for the same
/// user both land, with consecutive suffixes.
pub trait HistoryStore: Send + Sync {
    /// Appends `(query, join(indices, ", "))` as the user's next entry,
    /// creating the record if needed, and returns the updated recent window.
    ///
    /// Fails with [`HistoryError::MissingUserId`] before touching the store
    /// when `user_id` is blank.
    fn append<'a>(
        &'a self,
        user_id: &'a str,
        query: &'a str,
        indices: &'a [String],
    ) -> StoreFuture<'a, RecentWindow>;

    /// Read-only recent window. Unknown users get an empty window.
    fn recent<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, RecentWindow>;

    /// Full record of a user, if one exists.
    fn record<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<UserQueryRecord>>;

    /// Connectivity probe.
    fn ping(&self) -> StoreFuture<'_, ()>;
}

/// Rejects absent/blank user identifiers.
pub(crate) fn require_user_id(user_id: &str) -> Result<&str, HistoryError> {
    if user_id.trim().is_empty() {
        Err(HistoryError::MissingUserId)
    } else {
        Ok(user_id)
    }
}
