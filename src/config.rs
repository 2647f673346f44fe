// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] loaded once at startup. Nothing else in the crate reads the
//! environment; the loaded values are passed into the components that need
//! them.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HMAC secret used to sign and verify access tokens | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the redb document store | In-memory store |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS with `TLS_KEY_PATH`) | Unset |
//! | `TLS_KEY_PATH` | PEM private key | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable name for the token signing secret.
///
/// The service refuses to start without it: no token can be issued or
/// verified unless a secret is configured.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the document store directory.
///
/// When unset the server keeps all documents in memory, which is only
/// suitable for development.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// File name of the redb database inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "campaign.redb";

/// Configuration errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Token signing secret.
///
/// `Debug` is redacted so the secret never ends up in logs.
#[derive(Clone)]
pub struct JwtSecret(String);

impl JwtSecret {
    /// Wrap a secret. Empty (or whitespace-only) secrets are rejected.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(<redacted>)")
    }
}

/// Logging output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value. Unknown values fall back to pretty output.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// PEM files used to serve HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Process configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: JwtSecret,
    pub bind_addr: SocketAddr,
    pub data_dir: Option<PathBuf>,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup(JWT_SECRET_ENV)
            .and_then(JwtSecret::new)
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value: value.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    name: HOST_ENV,
                    value: host.clone(),
                })?;

        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        let log_format = lookup(LOG_FORMAT_ENV)
            .map(|value| LogFormat::parse(&value))
            .unwrap_or_default();

        Ok(Self {
            jwt_secret,
            bind_addr,
            data_dir,
            tls,
            log_format,
        })
    }

    /// Path of the redb file, when a data directory is configured.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(DATABASE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_secret_fails_closed() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(JWT_SECRET_ENV)));

        let err = AppConfig::from_lookup(lookup_from(&[(JWT_SECRET_ENV, "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(JWT_SECRET_ENV)));
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup_from(&[(JWT_SECRET_ENV, "s3cret")])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert!(config.data_dir.is_none());
        assert!(config.database_path().is_none());
        assert!(config.tls.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s3cret"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (DATA_DIR_ENV, "/var/lib/campaign"),
            (TLS_CERT_PATH_ENV, "/etc/tls/cert.pem"),
            (TLS_KEY_PATH_ENV, "/etc/tls/key.pem"),
            (LOG_FORMAT_ENV, "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(
            config.database_path(),
            Some(PathBuf::from("/var/lib/campaign").join(DATABASE_FILE))
        );
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert: PathBuf::from("/etc/tls/cert.pem"),
                key: PathBuf::from("/etc/tls/key.pem"),
            })
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s3cret"),
            (PORT_ENV, "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: PORT_ENV, .. }));
    }

    #[test]
    fn half_configured_tls_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s3cret"),
            (TLS_CERT_PATH_ENV, "/etc/tls/cert.pem"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(TLS_KEY_PATH_ENV)));
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = JwtSecret::new("do-not-print").unwrap();
        assert!(!format!("{secret:?}").contains("do-not-print"));
    }
}
