// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification against the issuer's JWKS.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, PublicKeyUse};
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde_json::{Map, Value};

use super::{AuthError, Claims, JwksManager};
use crate::config::AuthSettings;

/// Registered claims every token must carry.
const REQUIRED_CLAIMS: &[&str] = &["exp", "aud", "iss"];

/// The parts of a JWK needed to check an RS256 signature.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RsaKeyRecord {
    kty: &'static str,
    kid: String,
    key_use: Option<PublicKeyUse>,
    n: String,
    e: String,
}

impl RsaKeyRecord {
    fn from_jwk(jwk: &Jwk) -> Option<Self> {
        let AlgorithmParameters::RSA(rsa) = &jwk.algorithm else {
            return None;
        };

        Some(Self {
            kty: "RSA",
            kid: jwk.common.key_id.clone()?,
            key_use: jwk.common.public_key_use.clone(),
            n: rsa.n.clone(),
            e: rsa.e.clone(),
        })
    }

    fn decoding_key(&self) -> Result<DecodingKey, JwtError> {
        DecodingKey::from_rsa_components(&self.n, &self.e)
    }
}

/// Scan the whole key set for `kid`; the last match wins.
fn matching_key<'a>(key_set: &'a JwkSet, kid: &str) -> Option<&'a Jwk> {
    key_set
        .keys
        .iter()
        .filter(|jwk| jwk.common.key_id.as_deref() == Some(kid))
        .last()
}

/// Map a `jsonwebtoken` failure onto the authorization taxonomy.
fn classify(err: &JwtError) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
        _ => AuthError::InvalidToken,
    }
}

/// Verifies bearer tokens and returns their claims.
pub struct TokenVerifier {
    jwks: JwksManager,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier for the configured issuer and audience.
    pub fn new(jwks: JwksManager, settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(settings.algorithms()[0]);
        validation.algorithms = settings.algorithms().to_vec();
        validation.leeway = settings.leeway_secs();
        validation.set_audience(&[settings.audience()]);
        validation.set_issuer(&[settings.issuer()]);
        validation.set_required_spec_claims(REQUIRED_CLAIMS);

        Self { jwks, validation }
    }

    /// Key set fetcher backing this verifier.
    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Verify `token` and return its claims.
    ///
    /// The key set is only fetched once the token header is known to carry a
    /// key id.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "token header could not be decoded");
            AuthError::InvalidToken
        })?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let key_set = self.jwks.key_set().await?;
        let jwk = matching_key(&key_set, &kid).ok_or_else(|| {
            tracing::debug!(%kid, "no signing key matches token kid");
            AuthError::NoMatchingKey
        })?;
        let record = RsaKeyRecord::from_jwk(jwk).ok_or_else(|| {
            tracing::debug!(%kid, "matched signing key is not an RSA key");
            AuthError::InvalidToken
        })?;
        let decoding_key = record.decoding_key().map_err(|e| {
            tracing::debug!(kid = %record.kid, error = %e, "matched signing key is unusable");
            AuthError::InvalidToken
        })?;

        let token_data = decode::<Map<String, Value>>(token, &decoding_key, &self.validation)
            .map_err(|e| {
                let err = classify(&e);
                tracing::debug!(
                    kid = %record.kid,
                    kty = record.kty,
                    key_use = ?record.key_use,
                    error = %e,
                    code = err.error_code(),
                    "token rejected"
                );
                err
            })?;

        Ok(Claims::from_verified(token_data.claims))
    }
}
