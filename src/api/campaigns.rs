// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campaign endpoints. Store access is synchronous, so each handler runs
//! its service call on the blocking pool.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::run_blocking,
    auth::Auth,
    error::{ApiError, AppJson, ServiceError},
    models::{ApiResponse, Campaign, CampaignRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "Campaigns",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Campaigns owned by the caller", body = [Campaign]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_campaigns(
    Auth(ctx): Auth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Campaign>>>, ApiError> {
    let service = state.campaigns();
    let campaigns = run_blocking(
        ServiceError::OperationFailed("error getting campaigns"),
        move || service.list(&ctx),
    )
    .await?;
    Ok(Json(ApiResponse::with_data(
        "campaigns retrieved successfully",
        campaigns,
    )))
}

#[utoipa::path(
    post,
    path = "/api/campaigns",
    request_body = CampaignRequest,
    tag = "Campaigns",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Campaign created", body = Campaign),
        (status = 400, description = "Invalid campaign"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_campaign(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    AppJson(request): AppJson<CampaignRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Campaign>>), ApiError> {
    let fields = request.into_fields().map_err(ServiceError::Validation)?;
    let service = state.campaigns();
    let campaign = run_blocking(
        ServiceError::OperationFailed("error creating campaign"),
        move || service.create(&ctx, &fields),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("campaign created successfully", campaign)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/campaigns/{id}",
    params(("id" = String, Path, description = "Campaign identifier")),
    tag = "Campaigns",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Campaign", body = Campaign),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such campaign for this caller")
    )
)]
pub async fn get_campaign(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Campaign>>, ApiError> {
    let service = state.campaigns();
    let campaign = run_blocking(ServiceError::ResourceNotFound, move || {
        service.get(&ctx, &id)
    })
    .await?;
    Ok(Json(ApiResponse::with_data(
        "campaign retrieved successfully",
        campaign,
    )))
}

#[utoipa::path(
    put,
    path = "/api/campaigns/{id}",
    params(("id" = String, Path, description = "Campaign identifier")),
    request_body = CampaignRequest,
    tag = "Campaigns",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Campaign updated"),
        (status = 400, description = "Invalid campaign"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such campaign for this caller")
    )
)]
pub async fn update_campaign(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<CampaignRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let fields = request.into_fields().map_err(ServiceError::Validation)?;
    let service = state.campaigns();
    run_blocking(
        ServiceError::OperationFailed("error updating campaign"),
        move || service.update(&ctx, &id, &fields),
    )
    .await?;
    Ok(Json(ApiResponse::message("campaign updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/campaigns/{id}",
    params(("id" = String, Path, description = "Campaign identifier")),
    tag = "Campaigns",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Campaign deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such campaign for this caller")
    )
)]
pub async fn delete_campaign(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let service = state.campaigns();
    run_blocking(
        ServiceError::OperationFailed("error deleting campaign"),
        move || service.delete(&ctx, &id),
    )
    .await?;
    Ok(Json(ApiResponse::message("campaign deleted successfully")))
}
