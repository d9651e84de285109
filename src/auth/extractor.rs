// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction and the `Authorized` axum extractor.
//!
//! Protected handlers take `Authorized<P>` as their first argument. The
//! handler only runs once the token is verified and grants `P::NAME`:
//!
//! ```rust,ignore
//! async fn create_drink(
//!     auth: Authorized<PostDrinks>,
//!     State(state): State<AppState>,
//!     Json(request): Json<CreateDrinkRequest>,
//! ) -> Result<Json<DrinkDetailList>, ApiError> {
//!     // auth.claims is the verified payload
//! }
//! ```

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthGuard, Claims, Permission};

/// Return the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. The token itself is returned
/// as-is; verification happens later.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedAuthHeader)?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::MissingAuthHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::WrongScheme);
    }

    let token = parts.next().ok_or(AuthError::MissingToken)?;
    if parts.next().is_some() {
        return Err(AuthError::MalformedAuthHeader);
    }

    Ok(token)
}

/// Verified claims of a caller holding permission `P`.
pub struct Authorized<P: Permission> {
    pub claims: Claims,
    permission: PhantomData<P>,
}

impl<P, S> FromRequestParts<S> for Authorized<P>
where
    P: Permission,
    AuthGuard: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guard = AuthGuard::from_ref(state);
        let claims = guard.authorize(&parts.headers, P::NAME).await?;

        Ok(Authorized {
            claims,
            permission: PhantomData,
        })
    }
}
