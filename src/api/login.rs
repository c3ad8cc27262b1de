// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `/login`: issue a token and hand it out as the `sso` cookie.

use std::time::Duration;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, error, info};
use utoipa::ToSchema;

use crate::auth::{AuthError, ClientIp, LoginIdentity, SSO_COOKIE};
use crate::state::AppState;
use crate::token::{encode, issue};

/// Successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Username embedded in the issued token.
    pub user: String,
    /// Token expiry (Unix seconds).
    pub expiry: i32,
}

/// Issue an SSO token for the caller.
///
/// The token is bound to the client IP from the configured proxy header and
/// expires after the token TTL. The cookie itself lives for the (much
/// longer) cookie TTL.
#[utoipa::path(
    post,
    path = "/login",
    tag = "SSO",
    responses(
        (status = 200, description = "Logged in; `sso` cookie set", body = LoginResponse),
        (status = 401, description = "Client IP header missing or authentication failed"),
        (status = 500, description = "Token could not be signed")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    LoginIdentity(identity): LoginIdentity,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthError> {
    let now = Utc::now();
    info!(client_ip = %ip, at = %now.to_rfc3339(), "New login request");
    for (name, value) in &headers {
        debug!(header = %name, value = ?value, "Login request header");
    }

    // The username is echoed back in `Remote-User` by /auth.
    if HeaderValue::from_str(&identity.username).is_err() {
        info!(client_ip = %ip, "Login identity is not a valid header value");
        return Err(AuthError::AuthenticationFailed(
            "username contains characters not allowed in HTTP headers".into(),
        ));
    }

    let settings = &state.settings;
    let token = issue(
        &ip,
        identity.into(),
        now,
        settings.token_ttl,
        state.keys.signing_key(),
        settings.digest,
    )
    .map_err(|e| {
        error!(client_ip = %ip, error = %e, "Failed to issue SSO token");
        AuthError::InternalError(e.to_string())
    })?;

    let value = encode(&token).map_err(|e| {
        error!(error = %e, "Failed to encode SSO token");
        AuthError::InternalError(e.to_string())
    })?;
    debug!(hash = %hex::encode(&token.hash), bytes = value.len(), "Encoded SSO token");

    let cookie = HeaderValue::from_str(&session_cookie(&value, now, settings.cookie_ttl))
        .map_err(|e| AuthError::InternalError(e.to_string()))?;

    info!(
        client_ip = %ip,
        user = %token.payload.username,
        expiry = token.expiry,
        "Issued SSO token"
    );

    let mut response_headers = HeaderMap::new();
    response_headers.insert(SET_COOKIE, cookie);
    Ok((
        response_headers,
        Json(LoginResponse {
            user: token.payload.username,
            expiry: token.expiry,
        }),
    ))
}

/// `Set-Cookie` value for the `sso` cookie.
fn session_cookie(value: &str, now: DateTime<Utc>, ttl: Duration) -> String {
    let expires = TimeDelta::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(now);

    format!(
        "{SSO_COOKIE}={value}; Path=/; Expires={}; HttpOnly",
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_uses_http_date_expiry() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let cookie = session_cookie("abc", now, Duration::from_secs(24 * 60 * 60));
        assert_eq!(
            cookie,
            "sso=abc; Path=/; Expires=Wed, 15 Nov 2023 22:13:20 GMT; HttpOnly"
        );
    }
}
