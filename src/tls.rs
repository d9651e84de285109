// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Optional HTTPS listener configuration.

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsPaths;

/// Install the ring provider for rustls. Safe to call more than once.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Load the PEM certificate chain and private key.
pub async fn load_tls_config(paths: &TlsPaths) -> std::io::Result<RustlsConfig> {
    install_crypto_provider();
    RustlsConfig::from_pem_file(&paths.cert, &paths.key).await
}
