// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for all storage operations.
//!
//! Owned records carry the creator's subject in [`OWNER_FIELD`]. An
//! [`OwnerScope`] can only be built from an authenticated [`AuthContext`]
//! and is the sole source of the filters and stamps that touch that field,
//! so every scoped query is bounded by the caller's identity.

use serde_json::Value;

use crate::auth::AuthContext;

use super::document::{Document, Filter};

/// Field holding the owner's subject on owned records.
pub const OWNER_FIELD: &str = "created_by";

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_user_id(&self) -> &str;
}

/// The subject all scoped operations are bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerScope {
    subject: String,
}

impl OwnerScope {
    /// Scope to the caller of an authenticated request.
    pub fn of(ctx: &AuthContext) -> Self {
        Self {
            subject: ctx.subject().to_string(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Filter matching every record owned by this subject.
    pub fn filter(&self) -> Filter {
        Filter::new().eq(OWNER_FIELD, self.subject.as_str())
    }

    /// Filter matching one record, only if this subject owns it.
    pub fn filter_by_id(&self, id: &str) -> Filter {
        Filter::by_id(id).eq(OWNER_FIELD, self.subject.as_str())
    }

    /// Set the owner field on a new record, overwriting any caller value.
    pub fn stamp(&self, document: &mut Document) {
        document.insert(OWNER_FIELD.to_string(), Value::String(self.subject.clone()));
    }

    /// Whether `resource` belongs to this subject.
    pub fn owns<T: OwnedResource + ?Sized>(&self, resource: &T) -> bool {
        resource.owner_user_id() == self.subject
    }
}

/// Extension trait for ownership checks on lookup results.
///
/// A record owned by someone else is reported exactly like a missing one.
pub trait OwnershipCheck<T> {
    fn verify_owner(self, scope: &OwnerScope) -> Option<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for Option<T> {
    fn verify_owner(self, scope: &OwnerScope) -> Option<T> {
        match self {
            Some(resource) if scope.owns(&resource) => Some(resource),
            Some(resource) => {
                tracing::warn!(
                    user_id = %scope.subject(),
                    owner_id = %resource.owner_user_id(),
                    "Dropped record outside caller scope"
                );
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TOKEN_ISSUER;
    use serde_json::json;

    struct TestResource {
        owner: String,
    }

    impl OwnedResource for TestResource {
        fn owner_user_id(&self) -> &str {
            &self.owner
        }
    }

    fn scope(subject: &str) -> OwnerScope {
        OwnerScope::of(&AuthContext::new(subject, "Test", TOKEN_ISSUER).unwrap())
    }

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn filters_are_bound_to_subject() {
        let scope = scope("user_123");

        assert!(scope.filter().matches(&doc(json!({"created_by": "user_123"}))));
        assert!(!scope.filter().matches(&doc(json!({"created_by": "user_456"}))));
        assert!(!scope.filter().matches(&doc(json!({"name": "no owner"}))));

        let by_id = scope.filter_by_id("c1");
        assert!(by_id.matches(&doc(json!({"_id": "c1", "created_by": "user_123"}))));
        assert!(!by_id.matches(&doc(json!({"_id": "c1", "created_by": "user_456"}))));
        assert!(!by_id.matches(&doc(json!({"_id": "c2", "created_by": "user_123"}))));
    }

    #[test]
    fn stamp_overwrites_owner() {
        let mut document = doc(json!({"name": "x", "created_by": "someone_else"}));
        scope("user_123").stamp(&mut document);
        assert_eq!(document["created_by"], "user_123");
    }

    #[test]
    fn ownership_check_on_option() {
        let scope = scope("user_123");

        let mine = Some(TestResource {
            owner: "user_123".to_string(),
        });
        assert!(mine.verify_owner(&scope).is_some());

        let theirs = Some(TestResource {
            owner: "user_456".to_string(),
        });
        assert!(theirs.verify_owner(&scope).is_none());

        let missing: Option<TestResource> = None;
        assert!(missing.verify_owner(&scope).is_none());
    }
}
