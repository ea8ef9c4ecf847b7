//! Stored record model and conversion from raw MongoDB documents.
//!
//! A record holds the user's history as an ordered `entries` list. Records
//! written by the previous deployment instead carry flat `query_<n>` /
//! `indices_<n>` fields and key the user as `"user id"`;
//! [`UserQueryRecord::from_document`] reads both layouts, legacy entries first.

use std::collections::BTreeMap;

use mongodb::bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};

use crate::{errors::HistoryError, window::RecentWindow};

/// Document key holding the user identifier.
pub const USER_ID_FIELD: &str = "user_id";
/// Key the previous deployment stored the user identifier under.
pub const LEGACY_USER_ID_FIELD: &str = "user id";
/// Document key holding the ordered history list.
pub const ENTRIES_FIELD: &str = "entries";

const LEGACY_QUERY_PREFIX: &str = "query_";
const LEGACY_INDICES_PREFIX: &str = "indices_";

/// Separator used to render an identifier list into a single string.
pub const INDICES_SEPARATOR: &str = ", ";

/// Renders identifiers as one comma-and-space joined string.
///
/// `["10", "11"]` becomes `"10, 11"`; an empty list becomes `""`.
pub fn join_indices<I, S>(indices: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = indices
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    parts.join(INDICES_SEPARATOR)
}

/// One historical query together with its rendered identifier list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub indices: String,
}

impl HistoryEntry {
    pub fn new<I, S>(query: impl Into<String>, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            query: query.into(),
            indices: join_indices(indices),
        }
    }

    pub(crate) fn to_document(&self) -> Document {
        doc! { "query": self.query.as_str(), "indices": self.indices.as_str() }
    }
}

/// All history of a single user, oldest entry first.
///
/// The 1-based position of an entry is its suffix; suffixes never change
/// because entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQueryRecord {
    pub user_id: String,
    pub entries: Vec<HistoryEntry>,
}

impl UserQueryRecord {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by 1-based suffix.
    pub fn entry(&self, suffix: usize) -> Option<&HistoryEntry> {
        suffix.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Appends an entry and returns its suffix.
    pub fn push(&mut self, entry: HistoryEntry) -> usize {
        self.entries.push(entry);
        self.entries.len()
    }

    /// The three most recent entries, most recent first.
    pub fn recent(&self) -> RecentWindow {
        RecentWindow::from_entries(&self.entries)
    }

    /// Reads a record from a raw document, accepting both the `entries` list
    /// and legacy `query_<n>` / `indices_<n>` fields.
    ///
    /// # Errors
    /// - [`HistoryError::Decode`] if neither `user_id` nor `"user id"` is
    ///   present, or `entries` has the wrong shape
    /// - [`HistoryError::InvalidSuffix`] if a legacy field suffix is not a positive integer
    pub fn from_document(doc: &Document) -> Result<Self, HistoryError> {
        let user_id = match doc
            .get(USER_ID_FIELD)
            .or_else(|| doc.get(LEGACY_USER_ID_FIELD))
        {
            Some(value) => bson_to_text(value),
            None => return Err(HistoryError::Decode(format!("missing `{USER_ID_FIELD}`"))),
        };

        let mut entries = legacy_entries(doc)?;
        entries.extend(list_entries(doc)?);

        Ok(Self { user_id, entries })
    }
}

/// Legacy flat fields ordered by ascending suffix.
fn legacy_entries(doc: &Document) -> Result<Vec<HistoryEntry>, HistoryError> {
    let mut by_suffix: BTreeMap<u32, HistoryEntry> = BTreeMap::new();

    for (key, value) in doc.iter() {
        let (suffix, is_query) = if let Some(rest) = key.strip_prefix(LEGACY_QUERY_PREFIX) {
            (parse_suffix(key, rest)?, true)
        } else if let Some(rest) = key.strip_prefix(LEGACY_INDICES_PREFIX) {
            (parse_suffix(key, rest)?, false)
        } else {
            continue;
        };

        let slot = by_suffix.entry(suffix).or_default();
        if is_query {
            slot.query = bson_to_text(value);
        } else {
            slot.indices = bson_to_text(value);
        }
    }

    Ok(by_suffix.into_values().collect())
}

fn parse_suffix(field: &str, raw: &str) -> Result<u32, HistoryError> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(HistoryError::InvalidSuffix {
            field: field.to_string(),
        }),
    }
}

fn list_entries(doc: &Document) -> Result<Vec<HistoryEntry>, HistoryError> {
    let items = match doc.get(ENTRIES_FIELD) {
        None | Some(Bson::Null) => return Ok(Vec::new()),
        Some(Bson::Array(items)) => items,
        Some(other) => {
            return Err(HistoryError::Decode(format!(
                "`{ENTRIES_FIELD}` must be an array, got {:?}",
                other.element_type()
            )));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Bson::Document(d) => Ok(HistoryEntry {
                query: d.get("query").map(bson_to_text).unwrap_or_default(),
                indices: d.get("indices").map(bson_to_text).unwrap_or_default(),
            }),
            other => Err(HistoryError::Decode(format!(
                "`{ENTRIES_FIELD}[{i}]` must be a document, got {:?}",
                other.element_type()
            ))),
        })
        .collect()
}

fn bson_to_text(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_joined_with_comma_space() {
        assert_eq!(join_indices(["a", "b"]), "a, b");
        assert_eq!(join_indices(Vec::<String>::new()), "");
        assert_eq!(HistoryEntry::new("q", ["10", "11"]).indices, "10, 11");
    }

    #[test]
    fn suffixes_are_one_based() {
        let mut rec = UserQueryRecord::new("u1");
        assert_eq!(rec.push(HistoryEntry::new("first", ["1"])), 1);
        assert_eq!(rec.push(HistoryEntry::new("second", ["2"])), 2);

        assert_eq!(rec.entry(0), None);
        assert_eq!(rec.entry(1).map(|e| e.query.as_str()), Some("first"));
        assert_eq!(rec.entry(2).map(|e| e.query.as_str()), Some("second"));
        assert_eq!(rec.entry(3), None);
    }

    #[test]
    fn reads_entries_list() {
        let doc = doc! {
            "_id": 1,
            "user_id": "u1",
            "entries": [
                { "query": "gothic mansion", "indices": "10, 11" },
                { "query": "rainy noir", "indices": "" },
            ],
        };
        let rec = UserQueryRecord::from_document(&doc).unwrap();
        assert_eq!(rec.user_id, "u1");
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.entry(2).unwrap().query, "rainy noir");
    }

    #[test]
    fn reads_legacy_fields_in_numeric_order() {
        let doc = doc! {
            "user_id": "u1",
            "query_10": "tenth",
            "indices_10": "10",
            "query_2": "second",
            "indices_2": "2",
            "query_1": "first",
            "indices_1": "1",
        };
        let rec = UserQueryRecord::from_document(&doc).unwrap();
        let queries: Vec<_> = rec.entries.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(queries, ["first", "second", "tenth"]);
        assert_eq!(rec.entries[2].indices, "10");
    }

    #[test]
    fn reads_record_keyed_by_spaced_user_id() {
        let doc = doc! {
            "_id": 7,
            "user id": "u1",
            "query_1": "gothic",
            "indices_1": "10, 11",
        };
        let rec = UserQueryRecord::from_document(&doc).unwrap();
        assert_eq!(rec.user_id, "u1");
        assert_eq!(rec.entries, vec![HistoryEntry {
            query: "gothic".into(),
            indices: "10, 11".into()
        }]);
    }

    #[test]
    fn new_key_wins_over_spaced_key() {
        let doc = doc! { "user_id": "new", "user id": "old" };
        assert_eq!(UserQueryRecord::from_document(&doc).unwrap().user_id, "new");
    }

    #[test]
    fn record_without_any_user_key_is_rejected() {
        let doc = doc! { "query_1": "orphan" };
        assert!(matches!(
            UserQueryRecord::from_document(&doc),
            Err(HistoryError::Decode(_))
        ));
    }

    #[test]
    fn stored_entry_document_reads_back() {
        let entry = HistoryEntry::new("gothic atmospheric mansion", ["10", "11"]);
        let mut doc = doc! { "user_id": "u1" };
        doc.insert(ENTRIES_FIELD, vec![Bson::Document(entry.to_document())]);

        let rec = UserQueryRecord::from_document(&doc).unwrap();
        assert_eq!(rec.entries, vec![entry]);
        assert_eq!(rec.entry(1).unwrap().indices, "10, 11");
    }

    #[test]
    fn legacy_entries_precede_list_entries() {
        let doc = doc! {
            "user_id": "u1",
            "query_1": "old",
            "indices_1": "1",
            "entries": [ { "query": "new", "indices": "2" } ],
        };
        let rec = UserQueryRecord::from_document(&doc).unwrap();
        assert_eq!(rec.entry(1).unwrap().query, "old");
        assert_eq!(rec.entry(2).unwrap().query, "new");
    }

    #[test]
    fn missing_legacy_counterpart_reads_empty() {
        let doc = doc! { "user_id": "u1", "query_1": "lonely" };
        let rec = UserQueryRecord::from_document(&doc).unwrap();
        assert_eq!(rec.entries, vec![HistoryEntry {
            query: "lonely".into(),
            indices: String::new()
        }]);
    }

    #[test]
    fn non_numeric_suffix_is_an_error() {
        let doc = doc! { "user_id": "u1", "query_abc": "x" };
        let err = UserQueryRecord::from_document(&doc).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidSuffix { field } if field == "query_abc"));

        let zero = doc! { "user_id": "u1", "indices_0": "x" };
        assert!(UserQueryRecord::from_document(&zero).is_err());
    }

    #[test]
    fn malformed_entries_are_decode_errors() {
        let doc = doc! { "user_id": "u1", "entries": "nope" };
        assert!(matches!(
            UserQueryRecord::from_document(&doc),
            Err(HistoryError::Decode(_))
        ));

        let doc = doc! { "user_id": "u1", "entries": [1] };
        assert!(matches!(
            UserQueryRecord::from_document(&doc),
            Err(HistoryError::Decode(_))
        ));
    }
}
