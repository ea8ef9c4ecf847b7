//! The rolling window of the three most recent history entries.

use serde::{Deserialize, Serialize};

use crate::record::HistoryEntry;

/// Number of entries kept in a [`RecentWindow`].
pub const WINDOW_SIZE: usize = 3;

/// Three `(query, indices)` slots, slot 1 being the most recent.
///
/// Missing slots are empty strings. Serializes as the flat object
/// `{query_1, indices_1, query_2, indices_2, query_3, indices_3}`, which is
/// also the body accepted by the direct-input HTTP endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentWindow {
    pub query_1: String,
    pub indices_1: String,
    pub query_2: String,
    pub indices_2: String,
    pub query_3: String,
    pub indices_3: String,
}

impl RecentWindow {
    /// Builds the window from entries ordered oldest first.
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let mut newest_first = entries.iter().rev().take(WINDOW_SIZE).cloned();
        let mut next = || newest_first.next().unwrap_or_default();
        let (s1, s2, s3) = (next(), next(), next());

        Self {
            query_1: s1.query,
            indices_1: s1.indices,
            query_2: s2.query,
            indices_2: s2.indices,
            query_3: s3.query,
            indices_3: s3.indices,
        }
    }

    /// Slots as `(query, indices)` pairs, most recent first.
    pub fn slots(&self) -> [(&str, &str); WINDOW_SIZE] {
        [
            (self.query_1.as_str(), self.indices_1.as_str()),
            (self.query_2.as_str(), self.indices_2.as_str()),
            (self.query_3.as_str(), self.indices_3.as_str()),
        ]
    }

    pub fn current_query(&self) -> &str {
        &self.query_1
    }

    /// Queries of slots 2 and 3, empty ones skipped.
    pub fn previous_queries(&self) -> Vec<String> {
        [&self.query_2, &self.query_3]
            .into_iter()
            .filter(|q| !q.is_empty())
            .cloned()
            .collect()
    }

    /// Indices of all three slots, passed through unchanged.
    pub fn indices(&self) -> [String; WINDOW_SIZE] {
        [
            self.indices_1.clone(),
            self.indices_2.clone(),
            self.indices_3.clone(),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.slots().iter().all(|(q, i)| q.is_empty() && i.is_empty())
    }
}
