// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login identity source.
//!
//! `/login` asks an [`Authenticator`] who the caller is. Credential checks
//! against a real identity provider belong behind this trait; the bundled
//! [`FixedIdentity`] hands out one configured username to everyone.

use axum::http::request::Parts;
use thiserror::Error;

use crate::token::TokenPayload;

/// Authenticated identity, ready to be embedded in a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}

impl From<Identity> for TokenPayload {
    fn from(identity: Identity) -> Self {
        TokenPayload::new(identity.username)
    }
}

/// Rejection reported by an [`Authenticator`].
#[derive(Debug, Error)]
#[error("{0}")]
pub struct AuthFailure(pub String);

/// Decides who a login request belongs to.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, request: &Parts) -> Result<Identity, AuthFailure>;
}

/// Demo authenticator: every request is the same user.
#[derive(Debug, Clone)]
pub struct FixedIdentity {
    username: String,
}

impl FixedIdentity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl Authenticator for FixedIdentity {
    fn authenticate(&self, _request: &Parts) -> Result<Identity, AuthFailure> {
        Ok(Identity {
            username: self.username.clone(),
        })
    }
}
