// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SSO Gate - Signed-Cookie Single-Sign-On Service
//!
//! A reverse proxy delegates "is this request authenticated?" to this crate's
//! HTTP service, forwarding the caller's `sso` cookie and real IP. Tokens are
//! ECDSA P-256 signatures over the client IP, an expiry and a username; the
//! server keeps no session state.
//!
//! ## Modules
//!
//! - `token` - Token model, digest, codec, issuance and verification
//! - `keys` - PEM key loading
//! - `auth` - Request extractors and the login authenticator
//! - `api` - HTTP handlers (Axum)
//! - `config` - Command-line configuration and logging setup

pub mod api;
pub mod auth;
pub mod config;
pub mod keys;
pub mod state;
pub mod token;
