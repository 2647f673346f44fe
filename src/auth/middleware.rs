// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Wraps a router subtree so that every request must carry a valid bearer
//! token. Rejected requests get a uniform 401 and never reach the inner
//! handler; accepted requests continue with an [`AuthContext`] in their
//! extensions.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/campaigns", get(list_campaigns))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         require_auth,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::authenticate;
use crate::state::AppState;

/// Authentication guard.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), state.tokens.as_ref()) {
        Ok(ctx) => {
            tracing::debug!(user_id = %ctx.subject(), "Authenticated request");
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
