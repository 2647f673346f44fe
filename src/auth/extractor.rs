// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction, request authentication and the `Auth` extractor.
//!
//! Routes are protected by the [`require_auth`](super::middleware::require_auth)
//! layer, which calls [`authenticate`] and stores the resulting
//! [`AuthContext`] in the request extensions. Handlers then read it back
//! with the `Auth` extractor:
//!
//! ```rust,ignore
//! async fn list_campaigns(Auth(ctx): Auth, State(state): State<AppState>) {
//!     // ctx.subject() is the caller's user id
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Extensions, HeaderMap},
};

use super::{AuthContext, AuthError, TokenVerifier};

const BEARER_SCHEME: &str = "bearer";

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Returns `None` when the header
/// is absent, not valid ASCII, uses another scheme, or carries an empty or
/// whitespace-containing token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }

    Some(token)
}

/// Authenticate a request from its headers.
///
/// Every failure collapses into [`AuthError::Unauthorized`]; the token
/// service is not consulted when no bearer token is present.
pub fn authenticate<V>(headers: &HeaderMap, tokens: &V) -> Result<AuthContext, AuthError>
where
    V: TokenVerifier + ?Sized,
{
    let token = extract_bearer_token(headers).ok_or(AuthError::Unauthorized)?;

    let claims = tokens.verify(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected bearer token");
        AuthError::Unauthorized
    })?;

    AuthContext::from_claims(claims).ok_or_else(|| {
        tracing::warn!("Rejected bearer token without subject");
        AuthError::Unauthorized
    })
}

/// Read the authenticated identity attached to a request.
///
/// Fails with [`AuthError::NoTokenFound`] when the request did not pass
/// through the authentication layer. Never returns a default identity.
pub fn current_identity(extensions: &Extensions) -> Result<AuthContext, AuthError> {
    extensions.get::<AuthContext>().cloned().ok_or_else(|| {
        tracing::error!("No authenticated identity on request");
        AuthError::NoTokenFound
    })
}

/// Extractor for the authenticated caller.
///
/// Only succeeds on routes behind the `require_auth` layer.
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_identity(&parts.extensions).map(Auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, Identity, TokenError, TokenService, TOKEN_ISSUER};
    use crate::config::JwtSecret;
    use axum::http::{HeaderValue, Request};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Verifier that records how often it was consulted.
    #[derive(Default)]
    struct CountingVerifier {
        calls: AtomicUsize,
    }

    impl TokenVerifier for CountingVerifier {
        fn verify(&self, _token: &str) -> Result<Claims, TokenError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(TokenError::Malformed)
        }
    }

    fn tokens() -> TokenService {
        TokenService::new(&JwtSecret::new("test-secret").unwrap()).unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(extract_bearer_token(&headers_with("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers_with("BEARER abc")), Some("abc"));
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearerabc")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer abc def")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer  abc")), None);
    }

    #[test]
    fn authenticate_without_header_is_unauthorized() {
        let result = authenticate(&HeaderMap::new(), &tokens());
        assert_eq!(result, Err(AuthError::Unauthorized));
    }

    #[test]
    fn missing_or_empty_header_skips_token_service() {
        let verifier = CountingVerifier::default();

        assert_eq!(authenticate(&HeaderMap::new(), &verifier), Err(AuthError::Unauthorized));
        assert_eq!(authenticate(&headers_with("Bearer "), &verifier), Err(AuthError::Unauthorized));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);

        assert_eq!(authenticate(&headers_with("Bearer abc"), &verifier), Err(AuthError::Unauthorized));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn authenticate_with_garbage_is_unauthorized() {
        let result = authenticate(&headers_with("Bearer garbage"), &tokens());
        assert_eq!(result, Err(AuthError::Unauthorized));
    }

    #[test]
    fn authenticate_with_expired_token_is_unauthorized() {
        let tokens = tokens();
        let token = tokens
            .issue_at(
                &Identity::new("user_123", "Alice"),
                chrono::Utc::now() - chrono::Duration::days(31),
            )
            .unwrap();

        let result = authenticate(&headers_with(&format!("Bearer {token}")), &tokens);
        assert_eq!(result, Err(AuthError::Unauthorized));
    }

    #[test]
    fn authenticate_without_subject_is_unauthorized() {
        let tokens = tokens();
        let token = tokens.issue(&Identity::new("", "Nobody")).unwrap();

        let result = authenticate(&headers_with(&format!("Bearer {token}")), &tokens);
        assert_eq!(result, Err(AuthError::Unauthorized));
    }

    #[test]
    fn authenticate_returns_context() {
        let tokens = tokens();
        let token = tokens.issue(&Identity::new("user_123", "Alice")).unwrap();

        let ctx = authenticate(&headers_with(&format!("Bearer {token}")), &tokens).unwrap();
        assert_eq!(ctx.subject(), "user_123");
        assert_eq!(ctx.name(), "Alice");
        assert_eq!(ctx.issuer(), TOKEN_ISSUER);
    }

    #[test]
    fn current_identity_outside_scope_fails() {
        let result = current_identity(&Extensions::new());
        assert_eq!(result, Err(AuthError::NoTokenFound));
    }

    #[tokio::test]
    async fn auth_extractor_reads_extensions() {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let missing = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(missing, Err(AuthError::NoTokenFound)));

        let ctx = AuthContext::new("user_from_middleware", "Alice", TOKEN_ISSUER).unwrap();
        parts.extensions.insert(ctx);

        let Auth(found) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found.subject(), "user_from_middleware");
    }
}
