// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::health::HealthReport,
    auth::require_auth,
    error::{ApiError, ServiceError},
    models::{Campaign, CampaignRequest, LoginRequest, LoginResponse, RegisterRequest, UserProfile},
    state::AppState,
};

pub mod auth;
pub mod campaigns;
pub mod health;

/// Upper bound on handling a single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const TIMEOUT_MESSAGE: &str = "request timed out";

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/signin", post(auth::signin))
        .route("/create-account", post(auth::create_account));

    let protected_routes = Router::new()
        .route(
            "/campaigns",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/campaigns/{id}",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::delete_campaign),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api_routes = public_routes.merge(protected_routes).with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::map_response(timeout_envelope))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                ))
                .layer(CorsLayer::permissive()),
        )
}

/// Gives the bodiless timeout response the usual `{message, data}` envelope.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        ApiError::new(StatusCode::REQUEST_TIMEOUT, TIMEOUT_MESSAGE).into_response()
    } else {
        response
    }
}

/// Run synchronous store or hashing work on the blocking pool.
///
/// A task that panics or is cancelled is logged and reported as `failure`.
pub(crate) async fn run_blocking<T, F>(failure: ServiceError, task: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        tracing::error!(error = %e, "Blocking task failed");
        failure
    })?
}

/// Registers the bearer token scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::create_account,
        auth::signin,
        campaigns::list_campaigns,
        campaigns::create_campaign,
        campaigns::get_campaign,
        campaigns::update_campaign,
        campaigns::delete_campaign
    ),
    components(
        schemas(
            HealthReport,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserProfile,
            Campaign,
            CampaignRequest
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Account registration and sign-in"),
        (name = "Campaigns", description = "Campaigns owned by the signed-in user")
    )
)]
struct ApiDoc;
