// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token issuance and verification.
//!
//! Tokens are compact JWS strings signed with HS256 over a single shared
//! secret. The claim set is `{sub, name, issuer, exp}` and tokens are valid
//! for [`TOKEN_VALIDITY_DAYS`] days. There is no server-side state: a token
//! is either expired or not.
//!
//! ## Verification order
//!
//! 1. The header's `alg` must be present and in the HMAC family. This is
//!    checked on the raw header before any key material is touched, so
//!    `none` and asymmetric algorithms are rejected up front.
//! 2. The signature is verified against the shared secret.
//! 3. `exp` is compared to the current time with no leeway.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{Claims, Identity};
use crate::config::JwtSecret;

/// Token lifetime.
pub const TOKEN_VALIDITY_DAYS: i64 = 30;

/// Algorithm used when signing.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted when verifying.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Token service errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signing secret is not configured")]
    MissingSecret,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("token algorithm is missing or not an HMAC algorithm")]
    AlgorithmInvalid,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,
}

/// Verification half of the token service.
///
/// Request authentication depends on this rather than on [`TokenService`]
/// directly.
pub trait TokenVerifier: Send + Sync {
    /// Verify a token and return its claims.
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// Issues and verifies access tokens.
///
/// Holds the encoding and decoding keys derived from the shared secret at
/// construction. Immutable afterwards and safe to share across requests.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the configured secret.
    pub fn new(secret: &JwtSecret) -> Result<Self, TokenError> {
        let bytes = secret.as_bytes();
        if bytes.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_exp = true;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation,
        })
    }

    /// Issue a token for `identity`, valid for 30 days from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if it were signed at `issued_at`.
    pub fn issue_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: identity.subject.clone(),
            name: identity.name.clone(),
            issuer: identity.issuer.clone(),
            exp: (issued_at + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Error signing token");
            TokenError::Signing(e.to_string())
        })
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        check_header_algorithm(token)?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::AlgorithmInvalid
                }
                _ => TokenError::Malformed,
            }
        })?;

        Ok(data.claims)
    }
}

impl TokenVerifier for TokenService {
    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        TokenService::verify(self, token)
    }
}

/// Reject tokens whose header does not assert an accepted HMAC algorithm.
fn check_header_algorithm(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');
    let header_segment = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(_), Some(_), None) => header,
        _ => return Err(TokenError::Malformed),
    };

    let header_bytes =
        Base64UrlUnpadded::decode_vec(header_segment).map_err(|_| TokenError::Malformed)?;
    let header: serde_json::Value =
        serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;

    let accepted = header
        .get("alg")
        .and_then(|alg| alg.as_str())
        .and_then(|alg| alg.parse::<Algorithm>().ok())
        .is_some_and(|alg| ACCEPTED_ALGORITHMS.contains(&alg));

    if accepted {
        Ok(())
    } else {
        tracing::warn!(alg = ?header.get("alg"), "Rejected token with invalid algorithm");
        Err(TokenError::AlgorithmInvalid)
    }
}
