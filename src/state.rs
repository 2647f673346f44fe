// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::services::{CampaignService, CredentialService};
use crate::storage::DocumentStore;

/// Shared, immutable request state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: TokenService) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
        }
    }

    pub fn credentials(&self) -> CredentialService {
        CredentialService::new(self.store.clone(), self.tokens.clone())
    }

    pub fn campaigns(&self) -> CampaignService {
        CampaignService::new(self.store.clone())
    }

    /// In-memory state signed with a fixed test secret.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        use crate::config::JwtSecret;
        use crate::storage::MemoryStore;

        let secret = JwtSecret::new("test-secret").expect("non-empty secret");
        let tokens = TokenService::new(&secret).expect("valid secret");
        Self::new(Arc::new(MemoryStore::new()), tokens)
    }
}
