// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authorization error type.
///
/// Every failure in the extract → verify → check chain is one of these
/// variants. Several variants share the `"invalid header"` code; the
/// description tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is expected")]
    MissingAuthHeader,
    /// Scheme is not `Bearer`
    #[error("Authorization header must start with 'Bearer'")]
    WrongScheme,
    /// `Bearer` with nothing after it
    #[error("Token not found")]
    MissingToken,
    /// Extra parts, or a header value that is not visible ASCII
    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedAuthHeader,
    /// Token header carries no `kid`
    #[error("Authorization malformed")]
    MissingKeyId,
    /// No key in the JWKS matches the token's `kid`
    #[error("Unable to find the appropriate key")]
    NoMatchingKey,
    /// `exp` is in the past
    #[error("Token expired")]
    TokenExpired,
    /// Audience, issuer or another registered claim failed validation
    #[error("Incorrect claims. Please check the audience and issuer")]
    InvalidClaims,
    /// Token could not be parsed or its signature did not verify
    #[error("Unable to parse authentication token")]
    InvalidToken,
    /// Payload has no `permissions` claim
    #[error("Make sure that the permissions claim is included in the token payload")]
    PermissionsClaimMissing,
    /// Required permission is not granted
    #[error("Does not have the permission for this action")]
    Forbidden,
    /// JWKS fetch failed (details are logged where it happens)
    #[error("Unable to retrieve signing keys")]
    KeySetUnavailable,
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
    description: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "no authorization header",
            AuthError::WrongScheme => "wrong authorization header type",
            AuthError::MissingToken => "invalid token",
            AuthError::MalformedAuthHeader => "invalid header",
            AuthError::MissingKeyId => "invalid token header",
            AuthError::NoMatchingKey => "invalid header",
            AuthError::TokenExpired => "token expired",
            AuthError::InvalidClaims => "invalid claims",
            AuthError::InvalidToken => "invalid header",
            AuthError::PermissionsClaimMissing => "permissions claim not included",
            AuthError::Forbidden => "forbidden",
            AuthError::KeySetUnavailable => "key set unavailable",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::WrongScheme
            | AuthError::MissingToken
            | AuthError::MalformedAuthHeader
            | AuthError::MissingKeyId
            | AuthError::TokenExpired
            | AuthError::InvalidClaims => StatusCode::UNAUTHORIZED,
            // Permission failures stay on 400 for client compatibility.
            AuthError::NoMatchingKey
            | AuthError::InvalidToken
            | AuthError::PermissionsClaimMissing
            | AuthError::Forbidden => StatusCode::BAD_REQUEST,
            AuthError::KeySetUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.error_code(),
            description: self.to_string(),
        });
        (status, body).into_response()
    }
}
