// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Each variant is a distinct internal condition; all request-side ones
/// answer 401 so the proxy treats them alike.
#[derive(Debug)]
pub enum AuthError {
    /// Client-IP header absent or empty
    MissingIpHeader,
    /// Client-IP header is not visible ASCII
    InvalidIpHeader,
    /// No `sso` cookie on the request
    MissingCookie,
    /// Cookie value could not be decoded into a token
    MalformedToken,
    /// Token signature is invalid
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// The login authenticator rejected the request
    AuthenticationFailed(String),
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingIpHeader => "missing_ip_header",
            AuthError::InvalidIpHeader => "invalid_ip_header",
            AuthError::MissingCookie => "missing_cookie",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::AuthenticationFailed(_) => "authentication_failed",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingIpHeader
            | AuthError::InvalidIpHeader
            | AuthError::MissingCookie
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingIpHeader => write!(f, "Not logged in: client IP header is missing"),
            AuthError::InvalidIpHeader => write!(f, "Not logged in: client IP header is invalid"),
            AuthError::MissingCookie => write!(f, "Not logged in"),
            AuthError::MalformedToken => write!(f, "SSO cookie is malformed"),
            AuthError::InvalidSignature => write!(f, "Not authorized"),
            AuthError::TokenExpired => write!(f, "SSO token has expired"),
            AuthError::AuthenticationFailed(reason) => write!(f, "Authentication failed: {reason}"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
