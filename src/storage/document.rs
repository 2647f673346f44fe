// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Document store abstraction.
//!
//! Records are JSON objects grouped into named collections. Every object
//! has a string `_id`; the store assigns a UUID v4 when the caller does not.
//! Queries are conjunctions of top-level field equalities.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Primary key field present on every stored document.
pub const ID_FIELD: &str = "_id";

/// A stored JSON object.
pub type Document = Map<String, Value>;

/// Collections known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Users,
    Campaigns,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Users, Collection::Campaigns];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Campaigns => "campaigns",
        }
    }

    /// Fields whose values must be unique within the collection.
    pub fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Users => &["email"],
            Collection::Campaigns => &[],
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on `_id`.
    pub fn by_id(id: &str) -> Self {
        Self::new().eq(ID_FIELD, id)
    }

    /// Add a `field == value` condition.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Whether `document` satisfies every condition.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }

    /// The `_id` this filter pins, if any.
    pub fn id(&self) -> Option<&str> {
        self.conditions
            .iter()
            .find(|(field, _)| field == ID_FIELD)
            .and_then(|(_, value)| value.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate value for unique field {field} in {collection}")]
    Duplicate {
        collection: Collection,
        field: &'static str,
    },

    #[error("document must be a JSON object with a string _id")]
    InvalidDocument,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Single-document operations over named collections.
///
/// Each call is atomic on its own; there are no multi-document
/// transactions.
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its `_id`.
    ///
    /// Fails with [`StoreError::Duplicate`] when a unique field collides.
    fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<String>;

    /// First document matching `filter`.
    fn find_one(&self, collection: Collection, filter: &Filter) -> StoreResult<Option<Document>>;

    /// All documents matching `filter`.
    fn find_many(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// Merge `changes` into the first document matching `filter`.
    ///
    /// Returns `false` when nothing matched. `_id` cannot be changed.
    fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        changes: Document,
    ) -> StoreResult<bool>;

    /// Delete the first document matching `filter`. Returns `false` when
    /// nothing matched.
    fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<bool>;

    /// Check that the store is reachable.
    fn ping(&self) -> StoreResult<()>;
}

/// Serialize a record into a document.
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::InvalidDocument),
    }
}

/// Deserialize a document into a record.
pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Ensure the document has a string `_id`, assigning a fresh one if absent.
pub(crate) fn assign_id(document: &mut Document) -> StoreResult<String> {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(_) => Err(StoreError::InvalidDocument),
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(id)
        }
    }
}

/// Apply `changes` to `document`, leaving `_id` untouched.
pub(crate) fn merge(document: &mut Document, changes: Document) {
    for (field, value) in changes {
        if field != ID_FIELD {
            document.insert(field, value);
        }
    }
}

/// Find a unique field of `candidate` that collides with another document.
///
/// Documents with the same `_id` as the candidate are ignored so updates do
/// not conflict with themselves.
pub(crate) fn unique_conflict<'a>(
    collection: Collection,
    candidate: &Document,
    existing: impl IntoIterator<Item = &'a Document>,
) -> Option<&'static str> {
    let fields = collection.unique_fields();
    if fields.is_empty() {
        return None;
    }

    let candidate_id = candidate.get(ID_FIELD);
    existing
        .into_iter()
        .filter(|doc| doc.get(ID_FIELD) != candidate_id)
        .find_map(|doc| {
            fields.iter().copied().find(|field| {
                matches!(candidate.get(*field), Some(value) if !value.is_null() && doc.get(*field) == Some(value))
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::new().matches(&doc(json!({"a": 1}))));
    }

    #[test]
    fn filter_requires_all_conditions() {
        let filter = Filter::new().eq("a", 1).eq("b", "x");
        assert!(filter.matches(&doc(json!({"a": 1, "b": "x", "c": true}))));
        assert!(!filter.matches(&doc(json!({"a": 1, "b": "y"}))));
        assert!(!filter.matches(&doc(json!({"a": 1}))));
    }

    #[test]
    fn filter_id_lookup() {
        assert_eq!(Filter::by_id("abc").eq("owner", "u1").id(), Some("abc"));
        assert_eq!(Filter::new().eq("owner", "u1").id(), None);
    }

    #[test]
    fn assign_id_keeps_existing_and_generates_missing() {
        let mut with_id = doc(json!({"_id": "fixed"}));
        assert_eq!(assign_id(&mut with_id).unwrap(), "fixed");

        let mut without_id = doc(json!({"name": "x"}));
        let id = assign_id(&mut without_id).unwrap();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_eq!(without_id[ID_FIELD], json!(id));

        let mut bad_id = doc(json!({"_id": 7}));
        assert!(matches!(
            assign_id(&mut bad_id),
            Err(StoreError::InvalidDocument)
        ));
    }

    #[test]
    fn merge_never_touches_id() {
        let mut target = doc(json!({"_id": "a", "name": "old"}));
        merge(&mut target, doc(json!({"_id": "b", "name": "new"})));
        assert_eq!(target, doc(json!({"_id": "a", "name": "new"})));
    }

    #[test]
    fn unique_conflict_on_users_email() {
        let existing = vec![doc(json!({"_id": "1", "email": "a@x.io"}))];

        let clash = doc(json!({"_id": "2", "email": "a@x.io"}));
        assert_eq!(
            unique_conflict(Collection::Users, &clash, &existing),
            Some("email")
        );

        let same_doc = doc(json!({"_id": "1", "email": "a@x.io"}));
        assert_eq!(unique_conflict(Collection::Users, &same_doc, &existing), None);

        assert_eq!(unique_conflict(Collection::Campaigns, &clash, &existing), None);
    }
}
