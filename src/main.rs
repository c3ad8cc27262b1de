// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use sso_gate::api::router;
use sso_gate::auth::FixedIdentity;
use sso_gate::config::{init_tracing, Config};
use sso_gate::keys::KeyMaterial;
use sso_gate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_format);
    config.validate()?;

    // No degraded mode: without keys the service must not start.
    let keys = KeyMaterial::load(&config.privkey, config.pubkey.as_deref()).with_context(|| {
        format!(
            "failed to load key material from {}",
            config.privkey.display()
        )
    })?;
    info!(
        privkey = %config.privkey.display(),
        public_key = %keys.public_key_hex(),
        digest = %config.digest,
        "Loaded ECC key material"
    );

    let state = AppState::new(keys, config.settings())
        .with_authenticator(FixedIdentity::new(config.demo_user.clone()));
    let app = router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, ip_header = %config.ip_header, "SSO server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
