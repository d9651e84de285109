// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once, at startup, into
//! immutable structs. Request handling never touches the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Token issuer domain (host only) | Required |
//! | `API_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH0_JWKS_URL` | Override for the JWKS endpoint | `https://<domain>/.well-known/jwks.json` |
//! | `JWKS_CACHE_TTL_SECS` | Key set cache TTL, `0` disables caching | `0` |
//! | `JWKS_FETCH_TIMEOUT_SECS` | Key set fetch timeout | `10` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance for `exp`/`nbf` | `0` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; HTTPS when both are set | Unset |
//! | `SEED_SAMPLE_DRINK` | Insert the sample drink at startup | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use jsonwebtoken::Algorithm;
use url::Url;

pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";
pub const JWKS_URL_ENV: &str = "AUTH0_JWKS_URL";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_FETCH_TIMEOUT_ENV: &str = "JWKS_FETCH_TIMEOUT_SECS";
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const SEED_SAMPLE_DRINK_ENV: &str = "SEED_SAMPLE_DRINK";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default `RUST_LOG` filter.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Only RS256 is accepted. The issuer publishes RSA keys.
pub const ACCEPTED_ALGORITHMS: &[Algorithm] = &[Algorithm::RS256];

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Token verification settings.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    domain: String,
    audience: String,
    issuer: String,
    jwks_url: Url,
    algorithms: Vec<Algorithm>,
    jwks_cache_ttl: Duration,
    jwks_fetch_timeout: Duration,
    leeway_secs: u64,
}

impl AuthSettings {
    /// Build settings for an issuer domain such as `tenant.us.auth0.com`.
    ///
    /// The issuer becomes `https://<domain>/` and the JWKS endpoint
    /// `https://<domain>/.well-known/jwks.json`.
    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into();
        let audience = audience.into();

        if audience.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: API_AUDIENCE_ENV,
                value: audience,
                reason: "must not be empty".into(),
            });
        }

        let issuer = format!("https://{domain}/");
        let base = Url::parse(&issuer)
            .ok()
            .filter(|url| {
                url.has_host()
                    && url.path() == "/"
                    && url.query().is_none()
                    && url.fragment().is_none()
                    && url.username().is_empty()
            })
            .ok_or_else(|| ConfigError::Invalid {
                name: AUTH0_DOMAIN_ENV,
                value: domain.clone(),
                reason: "expected a bare host name".into(),
            })?;
        let jwks_url = base
            .join(".well-known/jwks.json")
            .map_err(|e| ConfigError::Invalid {
                name: AUTH0_DOMAIN_ENV,
                value: domain.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            domain,
            audience,
            issuer,
            jwks_url,
            algorithms: ACCEPTED_ALGORITHMS.to_vec(),
            jwks_cache_ttl: Duration::ZERO,
            jwks_fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            leeway_secs: 0,
        })
    }

    /// Load from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let domain = required(AUTH0_DOMAIN_ENV)?;
        let audience = required(API_AUDIENCE_ENV)?;
        let mut settings = Self::new(domain, audience)?;

        if let Some(raw) = optional(JWKS_URL_ENV) {
            let url = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                name: JWKS_URL_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            settings = settings.with_jwks_url(url);
        }
        if let Some(secs) = parsed::<u64>(JWKS_CACHE_TTL_ENV)? {
            settings = settings.with_jwks_cache_ttl(Duration::from_secs(secs));
        }
        if let Some(secs) = parsed::<u64>(JWKS_FETCH_TIMEOUT_ENV)? {
            settings.jwks_fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parsed::<u64>(JWT_LEEWAY_ENV)? {
            settings = settings.with_leeway(secs);
        }

        Ok(settings)
    }

    /// Fetch keys from a different endpoint (self-hosted issuers, tests).
    pub fn with_jwks_url(mut self, url: Url) -> Self {
        self.jwks_url = url;
        self
    }

    pub fn with_jwks_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = ttl;
        self
    }

    pub fn with_leeway(mut self, secs: u64) -> Self {
        self.leeway_secs = secs;
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn jwks_url(&self) -> &Url {
        &self.jwks_url
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn jwks_cache_ttl(&self) -> Duration {
        self.jwks_cache_ttl
    }

    pub fn jwks_fetch_timeout(&self) -> Duration {
        self.jwks_fetch_timeout
    }

    pub fn leeway_secs(&self) -> u64 {
        self.leeway_secs
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// PEM certificate chain and private key for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Listener and process settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
    pub seed_sample_drink: bool,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = optional(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parsed::<u16>(PORT_ENV)?.unwrap_or(8080);
        let addr = format!("{host}:{port}")
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: HOST_ENV,
                value: host.clone(),
                reason: e.to_string(),
            })?;

        let tls = match (optional(TLS_CERT_PATH_ENV), optional(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        Ok(Self {
            addr,
            tls,
            log_format: parsed::<LogFormat>(LOG_FORMAT_ENV)?.unwrap_or_default(),
            seed_sample_drink: optional(SEED_SAMPLE_DRINK_ENV).is_some(),
        })
    }
}

fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parsed<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                name,
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
