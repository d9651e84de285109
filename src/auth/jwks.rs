// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching.
//!
//! By default every verification fetches the key set fresh from the issuer.
//! A TTL cache can be switched on with `JWKS_CACHE_TTL_SECS`; a rotated or
//! revoked key is then honoured for at most one TTL after the issuer drops it.
//!
//! Keys of a type `jsonwebtoken` cannot model are skipped, so they never make
//! the rest of the set unusable.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use url::Url;

use super::error::AuthError;
use crate::config::AuthSettings;

/// Key set as published, before each key is interpreted.
#[derive(Deserialize)]
struct RawKeySet {
    keys: Vec<Value>,
}

impl RawKeySet {
    /// Keep the keys `jsonwebtoken` can model and skip the rest.
    fn into_key_set(self) -> JwkSet {
        let keys = self
            .keys
            .into_iter()
            .filter_map(|key| match serde_json::from_value::<Jwk>(key) {
                Ok(jwk) => Some(jwk),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unsupported JWKS entry");
                    None
                }
            })
            .collect();
        JwkSet { keys }
    }
}

/// JWKS cache entry.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// Fetches the issuer's signing keys.
#[derive(Clone)]
pub struct JwksManager {
    /// JWKS endpoint
    jwks_url: Url,
    /// Cache TTL; zero disables caching
    cache_ttl: Duration,
    cache: Arc<RwLock<Option<CacheEntry>>>,
    client: reqwest::Client,
}

impl JwksManager {
    /// Create a JWKS manager for `jwks_url` with the given fetch timeout.
    pub fn new(jwks_url: Url, fetch_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(fetch_timeout).build()?;
        Ok(Self {
            jwks_url,
            cache_ttl: Duration::ZERO,
            cache: Arc::new(RwLock::new(None)),
            client,
        })
    }

    /// Create from auth settings (endpoint, timeout and cache TTL).
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, reqwest::Error> {
        Ok(Self::new(settings.jwks_url().clone(), settings.jwks_fetch_timeout())?
            .with_cache_ttl(settings.jwks_cache_ttl()))
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &Url {
        &self.jwks_url
    }

    /// Current signing key set.
    ///
    /// Served from cache while it is younger than the TTL, fetched otherwise.
    pub async fn key_set(&self) -> Result<JwkSet, AuthError> {
        if self.cache_ttl.is_zero() {
            return self.fetch_jwks().await;
        }

        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(entry.jwks.clone());
                }
            }
        }

        self.refresh().await
    }

    /// Fetch the key set now, replacing any cached copy.
    pub async fn refresh(&self) -> Result<JwkSet, AuthError> {
        let jwks = self.fetch_jwks().await?;
        if !self.cache_ttl.is_zero() {
            let mut cache = self.cache.write().await;
            *cache = Some(CacheEntry {
                jwks: jwks.clone(),
                fetched_at: Instant::now(),
            });
        }
        Ok(jwks)
    }

    /// Check if a key set is cached and still within its TTL.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        match &*cache {
            Some(entry) => entry.fetched_at.elapsed() < self.cache_ttl,
            None => false,
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = self.jwks_url.as_str();
        tracing::debug!(%url, "fetching JWKS");

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!(%url, error = %e, "JWKS request failed");
            AuthError::KeySetUnavailable
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%url, %status, "JWKS endpoint returned an error status");
            return Err(AuthError::KeySetUnavailable);
        }

        let raw = response.json::<RawKeySet>().await.map_err(|e| {
            tracing::error!(%url, error = %e, "JWKS body is not a valid key set");
            AuthError::KeySetUnavailable
        })?;
        Ok(raw.into_key_set())
    }
}
