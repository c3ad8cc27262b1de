// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for SSO request metadata.
//!
//! ```rust,ignore
//! async fn my_handler(ClientIp(ip): ClientIp, SsoCookie(value): SsoCookie) -> impl IntoResponse {
//!     // ip is the proxy-supplied client address, value the raw cookie
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};
use tracing::info;

use super::{AuthError, Identity};
use crate::state::AppState;

/// Name of the cookie carrying the encoded token.
pub const SSO_COOKIE: &str = "sso";

/// Client IP taken from the configured proxy header.
///
/// The value is used verbatim: it is part of the signed digest.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = &state.settings.ip_header;

        let Some(value) = parts.headers.get(header) else {
            info!(header = %header, "Client IP header missing");
            return Err(AuthError::MissingIpHeader);
        };

        let ip = value.to_str().map_err(|_| {
            info!(header = %header, "Client IP header is not visible ASCII");
            AuthError::InvalidIpHeader
        })?;

        if ip.is_empty() {
            info!(header = %header, "Client IP header empty");
            return Err(AuthError::MissingIpHeader);
        }

        Ok(ClientIp(ip.to_owned()))
    }
}

/// Raw (still encoded) value of the `sso` cookie.
#[derive(Debug, Clone)]
pub struct SsoCookie(pub String);

impl<S: Send + Sync> FromRequestParts<S> for SsoCookie {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match find_cookie(&parts.headers, SSO_COOKIE) {
            Some(value) => Ok(SsoCookie(value.to_owned())),
            None => {
                info!("No sso cookie");
                Err(AuthError::MissingCookie)
            }
        }
    }
}

/// Identity produced by the configured [`Authenticator`](super::Authenticator).
#[derive(Debug, Clone)]
pub struct LoginIdentity(pub Identity);

impl FromRequestParts<AppState> for LoginIdentity {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .authenticator
            .authenticate(parts)
            .map(LoginIdentity)
            .map_err(|failure| {
                info!(reason = %failure, "Login rejected by authenticator");
                AuthError::AuthenticationFailed(failure.to_string())
            })
    }
}

/// First `name=value` pair across all `Cookie` headers.
///
/// A value wrapped in double quotes is unwrapped.
fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
        .map(|value| {
            value
                .strip_prefix('"')
                .and_then(|inner| inner.strip_suffix('"'))
                .unwrap_or(value)
        })
}
