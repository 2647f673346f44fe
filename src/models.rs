// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`/`Deserialize` and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Response Envelope
//!
//! Every response body, success or failure, is wrapped in [`ApiResponse`]:
//!
//! ```json
//! { "message": "campaign retrieved successfully", "data": { ... } }
//! ```
//!
//! ## Model Categories
//!
//! - **Accounts**: registration, sign-in and the public user profile
//! - **Campaigns**: campaign records and their create/update payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

// =============================================================================
// Response Envelope
// =============================================================================

/// Uniform `{message, data}` response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    /// Human readable outcome.
    pub message: String,
    /// Payload, `null` when there is none.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Envelope with a message and no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    /// Envelope with a message and a payload.
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Pick a single, stable message out of a set of validation failures.
///
/// Fields listed in `order` are reported first, in that order; any other
/// failing field follows by name.
pub fn first_validation_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let rank = |field: &str| {
        order
            .iter()
            .position(|f| *f == field)
            .unwrap_or(order.len())
    };

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| {
        rank(a.as_ref())
            .cmp(&rank(b.as_ref()))
            .then_with(|| a.cmp(b))
    });

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .unwrap_or_else(|| "invalid request".to_string())
}

/// A request body checked at the edge, reporting only its first problem.
pub trait CheckedRequest: Validate {
    /// Fields in the order they are checked.
    const FIELD_ORDER: &'static [&'static str];

    fn check(&self) -> Result<(), String> {
        self.validate()
            .map_err(|errors| first_validation_message(&errors, Self::FIELD_ORDER))
    }
}

// =============================================================================
// Account Models
// =============================================================================

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Display name (at least 3 characters).
    #[serde(default)]
    #[validate(length(min = 3, message = "name must be at least 3 characters"))]
    pub name: String,
    /// Email address, unique across accounts.
    #[serde(default)]
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Password (at least 6 characters).
    #[serde(default)]
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    /// Phone number (at least 10 characters).
    #[serde(default)]
    #[validate(length(min = 10, message = "msisdn must be at least 10 characters"))]
    pub msisdn: String,
}

impl CheckedRequest for RegisterRequest {
    const FIELD_ORDER: &'static [&'static str] = &["password", "msisdn", "email", "name"];
}

/// Request to sign in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email and password are required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "email and password are required"))]
    pub password: String,
}

impl CheckedRequest for LoginRequest {
    const FIELD_ORDER: &'static [&'static str] = &["email", "password"];
}

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
}

/// Successful sign-in payload: the profile plus a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Bearer token valid for 30 days.
    pub access_token: String,
}

// =============================================================================
// Campaign Models
// =============================================================================

/// A campaign owned by the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub banner_url: String,
    /// User id of the owner.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or replacing a campaign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CampaignRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(required(message = "start date is required"))]
    pub start_date: Option<DateTime<Utc>>,
    #[validate(required(message = "end date is required"))]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(min = 1, message = "banner url is required"))]
    pub banner_url: String,
}

impl CheckedRequest for CampaignRequest {
    const FIELD_ORDER: &'static [&'static str] =
        &["name", "description", "start_date", "end_date", "banner_url"];
}

/// Campaign fields after edge validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignFields {
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub banner_url: String,
}

impl CampaignRequest {
    /// Validate the payload and return the checked fields, or the message
    /// describing the first problem.
    pub fn into_fields(self) -> Result<CampaignFields, String> {
        self.check()?;

        let (Some(start_date), Some(end_date)) = (self.start_date, self.end_date) else {
            return Err("start date is required".to_string());
        };
        if end_date < start_date {
            return Err("end date must be after start date".to_string());
        }

        Ok(CampaignFields {
            name: self.name,
            description: self.description,
            start_date,
            end_date,
            banner_url: self.banner_url,
        })
    }
}
