// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Storage Module
//!
//! Persistent storage for users and campaigns, behind the
//! [`DocumentStore`] trait.
//!
//! ## Backends
//!
//! - [`RedbStore`]: embedded ACID database, used when `DATA_DIR` is set
//! - [`MemoryStore`]: process-local, used otherwise and in tests
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/campaign.redb
//!   users       _id -> {name, email, password, msisdn, address}
//!   campaigns   _id -> {name, description, start_date, end_date,
//!                       banner_url, created_by, created_at, updated_at}
//! ```
//!
//! ## Ownership
//!
//! Campaign access goes through [`CampaignRepository`], which can only be
//! built with an [`OwnerScope`]. Every filter it issues includes
//! `created_by == subject`.

pub mod document;
pub mod memory;
pub mod ownership;
pub mod redb_store;
pub mod repository;

pub use document::{Collection, Document, DocumentStore, Filter, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use ownership::{OwnedResource, OwnerScope, OwnershipCheck};
pub use redb_store::RedbStore;
pub use repository::{CampaignRepository, StoredCampaign, StoredUser, UserRepository};
