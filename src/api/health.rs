// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ApiResponse;
use crate::state::AppState;

/// Upper bound on the store ping.
const PING_TIMEOUT: Duration = Duration::from_secs(1);

/// Health check response with individual component status.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct HealthReport {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Document store status ("ok", "unavailable" or "timeout").
    pub store: String,
}

/// Ping the store on the blocking pool, bounded by [`PING_TIMEOUT`].
async fn check_store(state: &AppState) -> &'static str {
    let store = state.store.clone();
    let ping = tokio::task::spawn_blocking(move || store.ping());

    match tokio::time::timeout(PING_TIMEOUT, ping).await {
        Ok(Ok(Ok(()))) => "ok",
        Ok(Ok(Err(e))) => {
            tracing::warn!(error = %e, "Store ping failed");
            "unavailable"
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Store ping task failed");
            "unavailable"
        }
        Err(_) => {
            tracing::warn!("Store ping timed out");
            "timeout"
        }
    }
}

/// Health check endpoint handler.
///
/// Returns 200 if the store answers within a second, 503 otherwise.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthReport),
        (status = 503, description = "Service is unhealthy", body = HealthReport)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthReport>>) {
    let store = check_store(&state).await;
    let healthy = store == "ok";

    let report = HealthReport {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        store: store.to_string(),
    };

    if healthy {
        (
            StatusCode::OK,
            Json(ApiResponse::with_data("healthy", report)),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::with_data("unhealthy", report)),
        )
    }
}
