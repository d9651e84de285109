// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coffee Shop - Drinks Menu Service
//!
//! A small drinks API whose every endpoint is protected by RS256 bearer
//! tokens, verified against the issuer's JWKS, and by a per-route permission
//! string carried in the token's `permissions` claim.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token extraction, verification and permission checks
//! - `config` - Environment configuration
//! - `store` - In-memory drinks store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod tls;
