// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures: an in-process JWKS endpoint and token minting.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Router,
};
use coffee_shop_server::{
    auth::{AuthGuard, JwksManager, TokenVerifier},
    config::AuthSettings,
};
use jsonwebtoken::{encode, get_current_timestamp, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use url::Url;

pub const ISSUER_DOMAIN: &str = "coffee-test.us.auth0.com";
pub const AUDIENCE: &str = "drinks";
pub const KID: &str = "test-key-1";
pub const SUBJECT: &str = "auth0|barista";

/// Private half of the key published in `fixtures/jwks.json`.
pub const ISSUER_KEY: &[u8] = include_bytes!("../fixtures/issuer_rsa.pem");
/// A key the issuer never published.
pub const ROGUE_KEY: &[u8] = include_bytes!("../fixtures/rogue_rsa.pem");
pub const JWKS: &str = include_str!("../fixtures/jwks.json");

/// JWKS endpoint on `127.0.0.1` that counts how often it is fetched.
pub struct JwksServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl JwksServer {
    /// Serve the fixture key set.
    pub async fn start() -> Self {
        Self::serve(StatusCode::OK, JWKS.to_string()).await
    }

    pub async fn serve(status: StatusCode, body: String) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let app = Router::new().route(
            "/.well-known/jwks.json",
            get(move || {
                let counter = counter.clone();
                let body = body.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (status, [(CONTENT_TYPE, "application/json")], body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, hits }
    }

    /// Number of key set fetches served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/.well-known/jwks.json", self.addr)).unwrap()
    }

    /// Settings for the test issuer, fetching keys from this server.
    pub fn settings(&self) -> AuthSettings {
        AuthSettings::new(ISSUER_DOMAIN, AUDIENCE)
            .unwrap()
            .with_jwks_url(self.url())
    }

    pub fn verifier(&self, settings: &AuthSettings) -> TokenVerifier {
        let jwks = JwksManager::from_settings(settings).unwrap();
        TokenVerifier::new(jwks, settings)
    }

    pub fn guard(&self) -> AuthGuard {
        AuthGuard::from_settings(&self.settings()).unwrap()
    }
}

/// Claims the test issuer would put in a fresh access token.
pub fn claims(permissions: &[&str]) -> Value {
    let now = get_current_timestamp();
    json!({
        "iss": format!("https://{ISSUER_DOMAIN}/"),
        "aud": AUDIENCE,
        "sub": SUBJECT,
        "iat": now,
        "exp": now + 3600,
        "permissions": permissions,
    })
}

/// RS256 token signed with `pem` under `kid`.
pub fn sign(claims: &Value, kid: Option<&str>, pem: &[u8]) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem).unwrap();
    encode(&header, claims, &key).unwrap()
}

/// Token signed by the test issuer's published key.
pub fn token(claims: &Value) -> String {
    sign(claims, Some(KID), ISSUER_KEY)
}

pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}

pub fn an_hour_ago() -> u64 {
    get_current_timestamp() - Duration::from_secs(3600).as_secs()
}
