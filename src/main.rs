// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use coffee_shop_server::{
    api::router,
    auth::AuthGuard,
    config::{AuthSettings, ServerSettings},
    state::AppState,
    store::DrinkStore,
    telemetry::init_tracing,
    tls::load_tls_config,
};

#[tokio::main]
async fn main() {
    let server = ServerSettings::from_env().expect("Invalid server configuration");
    init_tracing(server.log_format);

    let auth_settings = AuthSettings::from_env().expect("Invalid auth configuration");
    tracing::info!(
        domain = auth_settings.domain(),
        issuer = auth_settings.issuer(),
        audience = auth_settings.audience(),
        jwks_url = %auth_settings.jwks_url(),
        jwks_cache_ttl_secs = auth_settings.jwks_cache_ttl().as_secs(),
        "token verification configured"
    );
    let guard = AuthGuard::from_settings(&auth_settings).expect("Failed to create JWKS client");

    let mut store = DrinkStore::new();
    if server.seed_sample_drink {
        let drink = store.seed_sample().expect("Failed to seed sample drink");
        tracing::info!(drink_id = drink.id, title = %drink.title, "seeded sample drink");
    }

    let app = router(AppState::new(store, guard));
    let addr = server.addr;

    match &server.tls {
        Some(paths) => {
            let tls_config = load_tls_config(paths)
                .await
                .expect("Failed to load TLS certificate and key");
            tracing::info!(%addr, "drinks API listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await
                .expect("HTTPS server failed");
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .expect("Failed to bind listener");
            tracing::info!(%addr, "drinks API listening on http (docs at /docs)");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .expect("HTTP server failed");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
