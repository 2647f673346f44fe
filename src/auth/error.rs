// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiResponse;

/// Message returned for every authentication failure.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Authentication error type.
///
/// Both variants render the same 401 response. The detailed cause of a
/// rejected token (expired, bad signature, wrong algorithm) is logged where
/// it happens and never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Missing, malformed, invalid or expired token, or a token without a subject
    Unauthorized,
    /// Identity requested outside an authenticated request
    NoTokenFound,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Unauthorized => write!(f, "token is unauthorized"),
            AuthError::NoTokenFound => write!(f, "no token found"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::message(UNAUTHORIZED_MESSAGE));
        (self.status_code(), body).into_response()
    }
}
