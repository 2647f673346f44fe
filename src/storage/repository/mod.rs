// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository provides operations for a specific entity type, using
//! a `DocumentStore` for all reads and writes.

pub mod campaigns;
pub mod users;

pub use campaigns::{CampaignRepository, StoredCampaign};
pub use users::{normalize_email, StoredUser, UserRepository};
