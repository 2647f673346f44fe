// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: `POST /api/create-account` and `POST /api/signin`.
//!
//! Password hashing is CPU-bound, so both handlers run the credential
//! service on the blocking pool.

use axum::{extract::State, Json};

use crate::{
    api::run_blocking,
    error::{ApiError, AppJson, ServiceError},
    models::{ApiResponse, CheckedRequest, LoginRequest, LoginResponse, RegisterRequest},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/create-account",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Account created"),
        (status = 400, description = "Invalid input or account could not be created")
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    request.check().map_err(ServiceError::Validation)?;

    let credentials = state.credentials();
    run_blocking(ServiceError::AccountCreationFailed, move || {
        credentials.register(request.into())
    })
    .await?;

    Ok(Json(ApiResponse::message("account created successfully")))
}

#[utoipa::path(
    post,
    path = "/api/signin",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Signed in; `data` holds the profile and access token", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    request.check().map_err(ServiceError::Validation)?;

    let credentials = state.credentials();
    let response = run_blocking(ServiceError::InvalidCredentials, move || {
        credentials.login(&request.email, &request.password)
    })
    .await?;

    Ok(Json(ApiResponse::with_data("login successful", response)))
}
