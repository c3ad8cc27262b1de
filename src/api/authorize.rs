// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `/auth`: the reverse proxy's auth subrequest.

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::{AuthError, ClientIp, SsoCookie};
use crate::state::AppState;
use crate::token::{decode, verify, Verification};

/// Header carrying the authenticated username.
pub const REMOTE_USER: HeaderName = HeaderName::from_static("remote-user");

/// Header carrying the token expiry (Unix seconds).
pub const REMOTE_EXPIRY: HeaderName = HeaderName::from_static("remote-expiry");

/// Successful authorization.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorizeResponse {
    /// Authenticated username.
    pub user: String,
    /// Token expiry (Unix seconds).
    pub expiry: i32,
}

/// Check the `sso` cookie against the client IP.
///
/// On success the identity is returned in `Remote-User` / `Remote-Expiry`
/// headers for the proxy to forward upstream.
#[utoipa::path(
    get,
    path = "/auth",
    tag = "SSO",
    responses(
        (status = 200, description = "Authorized", body = AuthorizeResponse,
            headers(
                ("Remote-User" = String, description = "Authenticated username"),
                ("Remote-Expiry" = i32, description = "Token expiry")
            )
        ),
        (status = 401, description = "Missing cookie or IP header, malformed, expired or forged token")
    )
)]
pub async fn authorize(
    State(state): State<AppState>,
    SsoCookie(cookie): SsoCookie,
    ClientIp(ip): ClientIp,
) -> Result<impl IntoResponse, AuthError> {
    let token = decode(&cookie).map_err(|e| {
        info!(client_ip = %ip, error = %e, "Rejecting undecodable sso cookie");
        AuthError::MalformedToken
    })?;

    let now = Utc::now();
    info!(client_ip = %ip, at = %now.to_rfc3339(), "New auth request");

    let payload = match verify(
        &ip,
        &token,
        now,
        state.keys.verifying_key(),
        state.settings.digest,
    ) {
        Verification::Valid(payload) => payload,
        Verification::Expired => {
            info!(client_ip = %ip, expiry = token.expiry, "SSO token expired");
            return Err(AuthError::TokenExpired);
        }
        Verification::InvalidSignature => {
            info!(client_ip = %ip, user = %token.payload.username, "SSO token signature invalid");
            return Err(AuthError::InvalidSignature);
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        REMOTE_USER,
        HeaderValue::from_str(&payload.username)
            .map_err(|_| AuthError::InternalError("username is not a valid header value".into()))?,
    );
    headers.insert(REMOTE_EXPIRY, HeaderValue::from(token.expiry));

    info!(client_ip = %ip, user = %payload.username, "Authorized");

    Ok((
        headers,
        Json(AuthorizeResponse {
            user: payload.username,
            expiry: token.expiry,
        }),
    ))
}
