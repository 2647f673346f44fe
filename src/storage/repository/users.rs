// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users live in the `users` collection; `email` is unique and always
//! stored trimmed and lower-cased.

use serde::{Deserialize, Serialize};

use super::super::document::{
    from_document, to_document, Collection, DocumentStore, Filter, StoreResult,
};
use crate::models::UserProfile;

/// User account as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID), also the token subject
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Normalized email address
    pub email: String,
    /// Argon2id PHC hash
    pub password: String,
    pub msisdn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl StoredUser {
    /// Public profile, without the password hash.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone_number: self.msisdn.clone(),
            address: self.address.clone(),
        }
    }
}

/// Canonical form used for storing and looking up emails.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for user accounts.
pub struct UserRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Insert a new user. Fails on a duplicate email.
    pub fn insert(&self, user: &StoredUser) -> StoreResult<()> {
        let mut user = user.clone();
        user.email = normalize_email(&user.email);

        self.store
            .insert_one(Collection::Users, to_document(&user)?)
            .map(|_| ())
    }

    /// Look up a user by email.
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredUser>> {
        let filter = Filter::new().eq("email", normalize_email(email));

        self.store
            .find_one(Collection::Users, &filter)?
            .map(from_document)
            .transpose()
    }
}
