// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoded token payload.

use serde::Serialize;
use serde_json::{Map, Value};

/// Name of the claim carrying granted permission strings.
pub const PERMISSIONS_CLAIM: &str = "permissions";

/// Claims of a token that passed signature and claims verification.
///
/// There is no public constructor and no `Deserialize` impl: the only way to
/// obtain a `Claims` is [`TokenVerifier::verify`](super::TokenVerifier::verify).
/// Handlers can therefore treat any `Claims` they receive as authenticated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub(crate) fn from_verified(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Look up a claim by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Subject (`sub`) of the token, if it is a string.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Granted permissions, or `None` when the claim is absent.
    ///
    /// A `permissions` value that is not an array yields an empty list, and
    /// non-string entries are skipped.
    pub fn permissions(&self) -> Option<Vec<&str>> {
        let granted = self.get(PERMISSIONS_CLAIM)?;
        Some(
            granted
                .as_array()
                .map(|values| values.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default(),
        )
    }
}

#[cfg(test)]
pub(crate) fn claims_from_json(value: Value) -> Claims {
    match value {
        Value::Object(map) => Claims::from_verified(map),
        other => panic!("claims must be a JSON object, got {other}"),
    }
}
