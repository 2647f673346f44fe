// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain services.
//!
//! - [`CredentialService`]: account registration and sign-in
//! - [`CampaignService`]: campaign CRUD scoped to the caller
//!
//! Services are synchronous over the [`DocumentStore`](crate::storage::DocumentStore)
//! and report failures as [`ServiceError`](crate::error::ServiceError).

pub mod campaigns;
pub mod credentials;

pub use campaigns::CampaignService;
pub use credentials::{CredentialService, NewAccount};
