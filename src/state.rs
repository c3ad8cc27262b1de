// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderName;

use crate::auth::{Authenticator, FixedIdentity};
use crate::keys::KeyMaterial;
use crate::token::DigestAlgorithm;

/// Default client-IP header set by the reverse proxy.
pub const DEFAULT_IP_HEADER: &str = "x-real-ip";

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(10);

/// Default `sso` cookie lifetime. Independent of, and looser than, the
/// token's own expiry.
pub const DEFAULT_COOKIE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Default identity handed out by [`FixedIdentity`].
pub const DEFAULT_DEMO_USER: &str = "jg123456";

/// Per-deployment protocol settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct SsoSettings {
    pub ip_header: HeaderName,
    pub digest: DigestAlgorithm,
    pub token_ttl: Duration,
    pub cookie_ttl: Duration,
}

impl Default for SsoSettings {
    fn default() -> Self {
        Self {
            ip_header: HeaderName::from_static(DEFAULT_IP_HEADER),
            digest: DigestAlgorithm::default(),
            token_ttl: DEFAULT_TOKEN_TTL,
            cookie_ttl: DEFAULT_COOKIE_TTL,
        }
    }
}

/// Immutable context shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<KeyMaterial>,
    pub settings: Arc<SsoSettings>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(keys: KeyMaterial, settings: SsoSettings) -> Self {
        Self {
            keys: Arc::new(keys),
            settings: Arc::new(settings),
            authenticator: Arc::new(FixedIdentity::new(DEFAULT_DEMO_USER)),
        }
    }

    /// Replace the login authenticator.
    pub fn with_authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Arc::new(authenticator);
        self
    }
}
