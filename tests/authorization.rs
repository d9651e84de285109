// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification and guard behavior against a live JWKS endpoint.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use coffee_shop_server::auth::AuthError;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use common::{an_hour_ago, bearer, claims, sign, token, JwksServer, ISSUER_KEY, KID, ROGUE_KEY, SUBJECT};

#[tokio::test]
async fn missing_header_fails_before_any_fetch() {
    let server = JwksServer::start().await;
    let guard = server.guard();

    let err = guard
        .authorize(&HeaderMap::new(), "get:drinks")
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::MissingAuthHeader);
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn valid_token_passes_the_guard() {
    let server = JwksServer::start().await;
    let guard = server.guard();
    let headers = bearer(&token(&claims(&["get:drinks"])));

    let claims = guard.authorize(&headers, "get:drinks").await.unwrap();

    assert_eq!(claims.subject(), Some(SUBJECT));
    assert_eq!(claims.permissions(), Some(vec!["get:drinks"]));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn protect_invokes_operation_once_with_payload() {
    let server = JwksServer::start().await;
    let guard = server.guard();
    let headers = bearer(&token(&claims(&["get:drinks"])));
    let calls = AtomicUsize::new(0);
    let counter = &calls;

    let subject = guard
        .protect(&headers, "get:drinks", move |claims| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            claims.subject().map(str::to_string)
        })
        .await
        .unwrap();

    assert_eq!(subject.as_deref(), Some(SUBJECT));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn garbage_token_is_invalid_header() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());

    let err = verifier.verify("garbage").await.unwrap_err();

    assert_eq!(err, AuthError::InvalidToken);
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.error_code(), "invalid header");
}

#[tokio::test]
async fn token_without_kid_is_rejected_without_fetch() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());
    let token = sign(&claims(&["get:drinks"]), None, ISSUER_KEY);

    let err = verifier.verify(&token).await.unwrap_err();

    assert_eq!(err, AuthError::MissingKeyId);
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn unknown_kid_finds_no_key() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());
    let token = sign(&claims(&["get:drinks"]), Some("rotated-away"), ISSUER_KEY);

    let err = verifier.verify(&token).await.unwrap_err();

    assert_eq!(err, AuthError::NoMatchingKey);
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn foreign_signature_under_known_kid_is_invalid() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());
    let token = sign(&claims(&["get:drinks"]), Some(KID), ROGUE_KEY);

    let err = verifier.verify(&token).await.unwrap_err();

    assert_eq!(err, AuthError::InvalidToken);
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hmac_token_is_invalid() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(KID.to_string());
    let token = encode(
        &header,
        &claims(&["get:drinks"]),
        &EncodingKey::from_secret(b"shared-secret"),
    )
    .unwrap();

    assert_eq!(
        verifier.verify(&token).await,
        Err(AuthError::InvalidToken)
    );
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());
    let mut expired = claims(&["get:drinks"]);
    expired["exp"] = json!(an_hour_ago());

    let err = verifier.verify(&token(&expired)).await.unwrap_err();

    assert_eq!(err, AuthError::TokenExpired);
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.error_code(), "token expired");
}

#[tokio::test]
async fn wrong_audience_is_invalid_claims() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());
    let mut other = claims(&["get:drinks"]);
    other["aud"] = json!("some-other-api");

    let err = verifier.verify(&token(&other)).await.unwrap_err();

    assert_eq!(err, AuthError::InvalidClaims);
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_issuer_is_invalid_claims() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());
    let mut other = claims(&["get:drinks"]);
    other["iss"] = json!("https://impostor.example.com/");

    assert_eq!(
        verifier.verify(&token(&other)).await,
        Err(AuthError::InvalidClaims)
    );
}

#[tokio::test]
async fn missing_expiry_is_invalid_claims() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());
    let mut no_exp = claims(&["get:drinks"]);
    no_exp.as_object_mut().unwrap().remove("exp");

    assert_eq!(
        verifier.verify(&token(&no_exp)).await,
        Err(AuthError::InvalidClaims)
    );
}

#[tokio::test]
async fn audience_list_containing_api_is_accepted() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());
    let mut multi = claims(&["get:drinks"]);
    multi["aud"] = json!(["drinks", "https://coffee-test.us.auth0.com/userinfo"]);

    assert!(verifier.verify(&token(&multi)).await.is_ok());
}

#[tokio::test]
async fn token_without_permissions_claim_is_rejected() {
    let server = JwksServer::start().await;
    let guard = server.guard();
    let mut bare = claims(&[]);
    bare.as_object_mut().unwrap().remove("permissions");

    let err = guard
        .authorize(&bearer(&token(&bare)), "get:drinks")
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::PermissionsClaimMissing);
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_permission_is_forbidden() {
    let server = JwksServer::start().await;
    let guard = server.guard();
    let headers = bearer(&token(&claims(&["get:drinks"])));

    let err = guard.authorize(&headers, "delete:drinks").await.unwrap_err();

    assert_eq!(err, AuthError::Forbidden);
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn repeated_verification_is_idempotent_and_refetches() {
    let server = JwksServer::start().await;
    let verifier = server.verifier(&server.settings());
    let token = token(&claims(&["get:drinks"]));

    let first = verifier.verify(&token).await.unwrap();
    let second = verifier.verify(&token).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn cache_ttl_collapses_fetches() {
    let server = JwksServer::start().await;
    let settings = server
        .settings()
        .with_jwks_cache_ttl(Duration::from_secs(60));
    let verifier = server.verifier(&settings);
    let token = token(&claims(&["get:drinks"]));

    verifier.verify(&token).await.unwrap();
    verifier.verify(&token).await.unwrap();

    assert_eq!(server.hits(), 1);
    assert!(verifier.jwks().is_cached().await);
}

#[tokio::test]
async fn failing_key_set_endpoint_is_a_server_error() {
    let server = JwksServer::serve(StatusCode::INTERNAL_SERVER_ERROR, "{}".to_string()).await;
    let verifier = server.verifier(&server.settings());

    let err = verifier
        .verify(&token(&claims(&["get:drinks"])))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::KeySetUnavailable);
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unparseable_key_set_is_a_server_error() {
    let server = JwksServer::serve(StatusCode::OK, "not json".to_string()).await;
    let verifier = server.verifier(&server.settings());

    assert_eq!(
        verifier.verify(&token(&claims(&["get:drinks"]))).await,
        Err(AuthError::KeySetUnavailable)
    );
}

#[tokio::test]
async fn non_rsa_key_under_matching_kid_is_invalid() {
    let jwks = json!({
        "keys": [{
            "kty": "EC",
            "kid": KID,
            "use": "sig",
            "crv": "P-256",
            "x": "f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU",
            "y": "x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0"
        }]
    });
    let server = JwksServer::serve(StatusCode::OK, jwks.to_string()).await;
    let verifier = server.verifier(&server.settings());

    assert_eq!(
        verifier.verify(&token(&claims(&["get:drinks"]))).await,
        Err(AuthError::InvalidToken)
    );
}

#[tokio::test]
async fn unsupported_key_in_set_does_not_block_verification() {
    let mut jwks: serde_json::Value = serde_json::from_str(common::JWKS).unwrap();
    jwks["keys"].as_array_mut().unwrap().insert(
        0,
        json!({ "kty": "AKP", "kid": "pq-key", "use": "sig", "alg": "ML-DSA-44", "pub": "AAAA" }),
    );
    let server = JwksServer::serve(StatusCode::OK, jwks.to_string()).await;
    let verifier = server.verifier(&server.settings());

    let claims = verifier
        .verify(&token(&claims(&["get:drinks"])))
        .await
        .unwrap();

    assert_eq!(claims.subject(), Some(SUBJECT));
}
