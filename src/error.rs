// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain errors and their HTTP rendering.
//!
//! Services return [`ServiceError`]; handlers convert it into [`ApiError`],
//! which renders the `{message, data: null}` envelope. Internal causes are
//! logged where they happen and never reach a response body.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::AuthError;
use crate::models::ApiResponse;

/// Message returned for any request body that fails to decode.
pub const DECODE_ERROR_MESSAGE: &str = "error decoding request body";

/// Domain failures returned by the credential and campaign services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("error generating token")]
    SigningError,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("error creating account")]
    AccountCreationFailed,

    #[error("campaign not found")]
    ResourceNotFound,

    #[error("{0}")]
    OperationFailed(&'static str),

    #[error("{0}")]
    Validation(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized | ServiceError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::AccountCreationFailed | ServiceError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::ResourceNotFound => StatusCode::NOT_FOUND,
            ServiceError::SigningError | ServiceError::OperationFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::message(self.message));
        (self.status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::new(err.status_code(), err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::from(ServiceError::Unauthorized).with_status(err.status_code())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        Self::bad_request(DECODE_ERROR_MESSAGE)
    }
}

/// JSON body extractor whose rejections use the response envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::new(StatusCode::NOT_FOUND, "missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");
    }

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ServiceError::AccountCreationFailed, StatusCode::BAD_REQUEST),
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::ResourceNotFound, StatusCode::NOT_FOUND),
            (
                ServiceError::OperationFailed("error getting campaigns"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ServiceError::SigningError, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn account_creation_message_does_not_name_the_cause() {
        let message = ServiceError::AccountCreationFailed.to_string();
        assert_eq!(message, "error creating account");
        assert!(!message.contains("email"));
        assert!(!message.contains("exists"));
    }

    #[test]
    fn auth_error_becomes_unauthorized() {
        let err = ApiError::from(AuthError::NoTokenFound);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Unauthorized");
    }

    #[tokio::test]
    async fn into_response_returns_envelope() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"message":"bad data","data":null}"#);
    }
}
