// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication for the Campaign API.
//!
//! ## Auth Flow
//!
//! 1. Client signs in with email and password (`POST /api/signin`)
//! 2. Server issues an HS256 token carrying `sub`, `name`, `issuer`, `exp`
//! 3. Client sends `Authorization: Bearer <token>` on protected routes
//! 4. `require_auth`:
//!    - Extracts the bearer token
//!    - Rejects non-HMAC algorithms before checking the signature
//!    - Verifies signature and expiry
//!    - Attaches an [`AuthContext`] to the request
//! 5. Handlers read the context with the [`Auth`] extractor and pass it to
//!    every owner-scoped operation
//!
//! ## Security
//!
//! - The signing secret is loaded once at startup; without it the server
//!   does not start
//! - All authentication failures produce the same 401 response
//! - Tokens live 30 days and cannot be revoked

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{AuthContext, Claims, Identity, TOKEN_ISSUER};
pub use error::AuthError;
pub use extractor::{authenticate, current_identity, extract_bearer_token, Auth};
pub use middleware::require_auth;
pub use token::{TokenError, TokenService, TokenVerifier};
