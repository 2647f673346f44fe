// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory document store.
//!
//! Used when no data directory is configured and throughout the tests.
//! Documents keep insertion order within a collection.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::document::{
    assign_id, merge, unique_conflict, Collection, Document, DocumentStore, Filter, StoreError,
    StoreResult, ID_FIELD,
};

type Collections = HashMap<Collection, Vec<Document>>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl DocumentStore for MemoryStore {
    fn insert_one(&self, collection: Collection, mut document: Document) -> StoreResult<String> {
        let id = assign_id(&mut document)?;
        let mut collections = self.write()?;
        let docs = collections.entry(collection).or_default();

        if let Some(field) = unique_conflict(collection, &document, docs.iter()) {
            return Err(StoreError::Duplicate { collection, field });
        }
        let by_id = Filter::by_id(&id);
        if docs.iter().any(|doc| by_id.matches(doc)) {
            return Err(StoreError::Duplicate {
                collection,
                field: ID_FIELD,
            });
        }

        docs.push(document);
        Ok(id)
    }

    fn find_one(&self, collection: Collection, filter: &Filter) -> StoreResult<Option<Document>> {
        let collections = self.read()?;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    fn find_many(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>> {
        let collections = self.read()?;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default())
    }

    fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        changes: Document,
    ) -> StoreResult<bool> {
        let mut collections = self.write()?;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let Some(index) = docs.iter().position(|doc| filter.matches(doc)) else {
            return Ok(false);
        };

        let mut updated = docs[index].clone();
        merge(&mut updated, changes);
        if let Some(field) = unique_conflict(collection, &updated, docs.iter()) {
            return Err(StoreError::Duplicate { collection, field });
        }

        docs[index] = updated;
        Ok(true)
    }

    fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<bool> {
        let mut collections = self.write()?;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };

        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn insert_and_find() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Campaigns, doc(json!({"name": "a", "created_by": "u1"})))
            .unwrap();

        let found = store
            .find_one(Collection::Campaigns, &Filter::by_id(&id))
            .unwrap()
            .unwrap();
        assert_eq!(found["name"], "a");
        assert_eq!(found["_id"], json!(id));
    }

    #[test]
    fn find_many_filters_and_keeps_order() {
        let store = MemoryStore::new();
        for (name, owner) in [("a", "u1"), ("b", "u2"), ("c", "u1")] {
            store
                .insert_one(Collection::Campaigns, doc(json!({"name": name, "created_by": owner})))
                .unwrap();
        }

        let names: Vec<_> = store
            .find_many(Collection::Campaigns, &Filter::new().eq("created_by", "u1"))
            .unwrap()
            .into_iter()
            .map(|d| d["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("a"), json!("c")]);
    }

    #[test]
    fn unique_email_is_enforced() {
        let store = MemoryStore::new();
        store
            .insert_one(Collection::Users, doc(json!({"email": "a@x.io"})))
            .unwrap();

        let result = store.insert_one(Collection::Users, doc(json!({"email": "a@x.io"})));
        assert!(matches!(
            result,
            Err(StoreError::Duplicate { field: "email", .. })
        ));
    }

    #[test]
    fn update_and_delete_report_matches() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Campaigns, doc(json!({"name": "a"})))
            .unwrap();

        assert!(store
            .update_one(Collection::Campaigns, &Filter::by_id(&id), doc(json!({"name": "b"})))
            .unwrap());
        assert!(!store
            .update_one(Collection::Campaigns, &Filter::by_id("missing"), doc(json!({"name": "c"})))
            .unwrap());

        let found = store
            .find_one(Collection::Campaigns, &Filter::by_id(&id))
            .unwrap()
            .unwrap();
        assert_eq!(found["name"], "b");

        assert!(store.delete_one(Collection::Campaigns, &Filter::by_id(&id)).unwrap());
        assert!(!store.delete_one(Collection::Campaigns, &Filter::by_id(&id)).unwrap());
    }

    #[test]
    fn ping_succeeds() {
        assert!(MemoryStore::new().ping().is_ok());
    }
}
