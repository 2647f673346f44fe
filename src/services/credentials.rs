// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account registration and sign-in.
//!
//! Failures are deliberately coarse: every registration failure is
//! [`ServiceError::AccountCreationFailed`] and every sign-in failure short
//! of token signing is [`ServiceError::InvalidCredentials`], so responses
//! never reveal whether an email is registered.

use std::sync::Arc;

use crate::auth::password::{hash_password, verify_dummy, verify_password};
use crate::auth::{Identity, TokenService};
use crate::error::ServiceError;
use crate::models::{LoginResponse, RegisterRequest};
use crate::storage::{DocumentStore, StoredUser, UserRepository};

/// A validated registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub msisdn: String,
}

impl From<RegisterRequest> for NewAccount {
    fn from(request: RegisterRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
            msisdn: request.msisdn,
        }
    }
}

pub struct CredentialService {
    store: Arc<dyn DocumentStore>,
    tokens: Arc<TokenService>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    /// Create an account with a freshly hashed password.
    pub fn register(&self, account: NewAccount) -> Result<(), ServiceError> {
        let password = hash_password(&account.password).map_err(|e| {
            tracing::error!(error = %e, "Error hashing password");
            ServiceError::AccountCreationFailed
        })?;

        let user = StoredUser {
            id: uuid::Uuid::new_v4().to_string(),
            name: account.name,
            email: account.email,
            password,
            msisdn: account.msisdn,
            address: None,
        };

        UserRepository::new(self.store.as_ref())
            .insert(&user)
            .map_err(|e| {
                tracing::error!(error = %e, "Error inserting user");
                ServiceError::AccountCreationFailed
            })?;

        tracing::info!(user_id = %user.id, "Account created");
        Ok(())
    }

    /// Check credentials and issue an access token.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        let user = match UserRepository::new(self.store.as_ref()).find_by_email(email) {
            Ok(Some(user)) => user,
            Ok(None) => {
                verify_dummy(password);
                tracing::info!("Sign-in for unknown email");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => {
                verify_dummy(password);
                tracing::error!(error = %e, "Error finding user");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        match verify_password(password, &user.password) {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(user_id = %user.id, "Sign-in with wrong password");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Error verifying password");
                return Err(ServiceError::InvalidCredentials);
            }
        }

        let access_token = self
            .tokens
            .issue(&Identity::new(user.id.as_str(), user.name.as_str()))
            .map_err(|_| ServiceError::SigningError)?;

        Ok(LoginResponse {
            profile: user.profile(),
            access_token,
        })
    }
}
