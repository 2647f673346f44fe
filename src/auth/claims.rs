// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims, identities and the per-request authentication context.

use serde::{Deserialize, Serialize};

/// Fixed `issuer` claim embedded in every token this service signs.
pub const TOKEN_ISSUER: &str = "campaign";

/// The principal a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque subject id (the user record's `_id`)
    pub subject: String,
    /// Display name
    pub name: String,
    /// Issuer string
    pub issuer: String,
}

impl Identity {
    /// Identity issued by this service.
    pub fn new(subject: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            name: name.into(),
            issuer: TOKEN_ISSUER.to_string(),
        }
    }
}

/// Claim set carried inside a signed token.
///
/// `sub`, `name` and `issuer` default to empty strings when absent so a
/// token with a missing subject still decodes and is then rejected by
/// [`AuthContext::from_claims`] rather than by a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    #[serde(default)]
    pub sub: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Issuer
    #[serde(default)]
    pub issuer: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
}

/// Authenticated identity attached to a single request.
///
/// Only constructible with a non-empty subject, so holding one always means
/// the caller presented a verified token. Handlers obtain it through the
/// [`Auth`](super::Auth) extractor and pass it explicitly to every
/// owner-scoped operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    sub: String,
    issuer: String,
    name: String,
}

impl AuthContext {
    /// Build a context from verified claims. Returns `None` when `sub` is empty.
    pub fn from_claims(claims: Claims) -> Option<Self> {
        Self::new(claims.sub, claims.name, claims.issuer)
    }

    /// Build a context from its parts. Returns `None` when `sub` is empty.
    pub fn new(
        sub: impl Into<String>,
        name: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Option<Self> {
        let sub = sub.into();
        if sub.trim().is_empty() {
            return None;
        }
        Some(Self {
            sub,
            issuer: issuer.into(),
            name: name.into(),
        })
    }

    /// Subject id of the caller.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_uses_service_issuer() {
        let identity = Identity::new("user_123", "Alice Smith");
        assert_eq!(identity.issuer, TOKEN_ISSUER);
    }

    #[test]
    fn context_requires_subject() {
        let claims = Claims {
            sub: String::new(),
            name: "Alice".to_string(),
            issuer: TOKEN_ISSUER.to_string(),
            exp: 0,
        };
        assert!(AuthContext::from_claims(claims).is_none());
        assert!(AuthContext::new("  ", "Alice", TOKEN_ISSUER).is_none());
    }

    #[test]
    fn context_carries_claims() {
        let claims = Claims {
            sub: "user_123".to_string(),
            name: "Alice".to_string(),
            issuer: TOKEN_ISSUER.to_string(),
            exp: 1700003600,
        };
        let ctx = AuthContext::from_claims(claims).unwrap();
        assert_eq!(ctx.subject(), "user_123");
        assert_eq!(ctx.name(), "Alice");
        assert_eq!(ctx.issuer(), TOKEN_ISSUER);
    }

    #[test]
    fn claims_tolerate_missing_subject() {
        let claims: Claims = serde_json::from_str(r#"{"exp":1700003600}"#).unwrap();
        assert!(claims.sub.is_empty());
    }
}
