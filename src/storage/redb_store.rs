// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! One table per collection, keyed by `_id`:
//!
//! - `users`: `_id` → JSON bytes
//! - `campaigns`: `_id` → JSON bytes
//!
//! Every mutating operation runs in its own write transaction, so unique
//! field checks and the write they guard are atomic.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde_json::Value;

use super::document::{
    assign_id, merge, unique_conflict, Collection, Document, DocumentStore, Filter, StoreError,
    StoreResult, ID_FIELD,
};

// =============================================================================
// Table Definitions
// =============================================================================

const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

const CAMPAIGNS: TableDefinition<&str, &[u8]> = TableDefinition::new("campaigns");

fn table_for(collection: Collection) -> TableDefinition<'static, &'static str, &'static [u8]> {
    match collection {
        Collection::Users => USERS,
        Collection::Campaigns => CAMPAIGNS,
    }
}

// =============================================================================
// Scan Helpers
// =============================================================================

fn decode(bytes: &[u8]) -> StoreResult<Document> {
    match serde_json::from_slice(bytes)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::InvalidDocument),
    }
}

fn document_id(document: &Document) -> StoreResult<String> {
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(StoreError::InvalidDocument)
}

/// Collect documents matching `filter`, stopping after `limit` if given.
///
/// Filters that pin `_id` use a point lookup instead of a full scan.
fn scan<T>(table: &T, filter: &Filter, limit: Option<usize>) -> StoreResult<Vec<Document>>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    if let Some(id) = filter.id() {
        let found = match table.get(id)? {
            Some(value) => Some(decode(value.value())?),
            None => None,
        };
        return Ok(found.into_iter().filter(|doc| filter.matches(doc)).collect());
    }

    let mut results = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        let doc = decode(value.value())?;
        if filter.matches(&doc) {
            results.push(doc);
            if limit.is_some_and(|limit| results.len() >= limit) {
                break;
            }
        }
    }
    Ok(results)
}

// =============================================================================
// RedbStore
// =============================================================================

/// Persistent document store.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Unavailable(format!("{}: {e}", parent.display())))?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            for collection in Collection::ALL {
                let _ = write_txn.open_table(table_for(collection))?;
            }
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Opened document store");
        Ok(Self { db })
    }
}

impl DocumentStore for RedbStore {
    fn insert_one(&self, collection: Collection, mut document: Document) -> StoreResult<String> {
        let id = assign_id(&mut document)?;
        let json = serde_json::to_vec(&document)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_for(collection))?;

            if table.get(id.as_str())?.is_some() {
                return Err(StoreError::Duplicate {
                    collection,
                    field: ID_FIELD,
                });
            }
            if !collection.unique_fields().is_empty() {
                let existing = scan(&table, &Filter::new(), None)?;
                if let Some(field) = unique_conflict(collection, &document, &existing) {
                    return Err(StoreError::Duplicate { collection, field });
                }
            }

            table.insert(id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(id)
    }

    fn find_one(&self, collection: Collection, filter: &Filter) -> StoreResult<Option<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_for(collection))?;
        Ok(scan(&table, filter, Some(1))?.into_iter().next())
    }

    fn find_many(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_for(collection))?;
        scan(&table, filter, None)
    }

    fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        changes: Document,
    ) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_for(collection))?;

            let Some(mut document) = scan(&table, filter, Some(1))?.into_iter().next() else {
                return Ok(false);
            };
            let id = document_id(&document)?;
            merge(&mut document, changes);

            if !collection.unique_fields().is_empty() {
                let existing = scan(&table, &Filter::new(), None)?;
                if let Some(field) = unique_conflict(collection, &document, &existing) {
                    return Err(StoreError::Duplicate { collection, field });
                }
            }

            let json = serde_json::to_vec(&document)?;
            table.insert(id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_for(collection))?;

            let Some(document) = scan(&table, filter, Some(1))?.into_iter().next() else {
                return Ok(false);
            };
            let id = document_id(&document)?;
            table.remove(id.as_str())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    fn ping(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        Ok(())
    }
}
