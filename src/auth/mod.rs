// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Bearer token authorization for the drinks API.
//!
//! ## Flow
//!
//! 1. Client sends `Authorization: Bearer <JWT>` issued by the identity provider
//! 2. Server:
//!    - extracts the token from the header
//!    - reads the token's `kid` and fetches the issuer JWKS over HTTPS
//!    - verifies the RS256 signature, `aud`, `iss` and `exp`
//!    - checks the route's permission string against the `permissions` claim
//! 3. The handler runs with the verified claims as its first argument
//!
//! ## Failures
//!
//! Every failure is an [`AuthError`] rendered as
//! `{"success": false, "error": <status>, "message": <code>}`.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use claims::{Claims, PERMISSIONS_CLAIM};
pub use error::AuthError;
pub use extractor::{bearer_token, Authorized};
pub use guard::AuthGuard;
pub use jwks::JwksManager;
pub use permissions::{
    check_permissions, DeleteDrinks, GetDrinks, GetDrinksDetail, PatchDrinks, Permission,
    PostDrinks,
};
pub use verifier::TokenVerifier;
