// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization guard: extract → verify → check permission.

use std::future::Future;
use std::sync::Arc;

use axum::http::HeaderMap;

use super::{bearer_token, check_permissions, AuthError, Claims, JwksManager, TokenVerifier};
use crate::config::AuthSettings;

/// Gate in front of protected operations.
///
/// Cheap to clone; the verifier is shared.
#[derive(Clone)]
pub struct AuthGuard {
    verifier: Arc<TokenVerifier>,
}

impl AuthGuard {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }

    /// Build the JWKS client and verifier from settings.
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, reqwest::Error> {
        let jwks = JwksManager::from_settings(settings)?;
        Ok(Self::new(TokenVerifier::new(jwks, settings)))
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Authorize a request for `permission` and return the verified claims.
    ///
    /// Steps run in order and stop at the first failure, so a request
    /// without a token never reaches the key set endpoint.
    pub async fn authorize(&self, headers: &HeaderMap, permission: &str) -> Result<Claims, AuthError> {
        let outcome = async {
            let token = bearer_token(headers)?;
            let claims = self.verifier.verify(token).await?;
            check_permissions(permission, &claims)?;
            Ok::<_, AuthError>(claims)
        }
        .await;

        if let Err(err) = &outcome {
            tracing::debug!(
                permission,
                code = err.error_code(),
                status = err.status_code().as_u16(),
                "authorization rejected"
            );
        }
        outcome
    }

    /// Run `operation` with the verified claims if the request holds
    /// `permission`.
    ///
    /// The operation receives the claims as its only argument; anything else
    /// it needs is captured by the closure. It is not called on failure.
    pub async fn protect<F, Fut>(
        &self,
        headers: &HeaderMap,
        permission: &str,
        operation: F,
    ) -> Result<Fut::Output, AuthError>
    where
        F: FnOnce(Claims) -> Fut,
        Fut: Future,
    {
        let claims = self.authorize(headers, permission).await?;
        Ok(operation(claims).await)
    }
}
