// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Edge
//!
//! Request-side plumbing between HTTP and the token protocol.
//!
//! ## Auth Flow
//!
//! 1. The reverse proxy overwrites the client-IP header (default `X-Real-Ip`)
//! 2. `/login`: the [`Authenticator`] produces an identity, a token is issued
//!    for that identity and IP and handed out as the `sso` cookie
//! 3. `/auth`: the proxy forwards the `sso` cookie and the IP header; the
//!    token is decoded and verified against that IP
//!
//! ## Security
//!
//! - The IP header is trusted as-is; the proxy must strip client-supplied
//!   copies
//! - Missing metadata, undecodable cookies, expired tokens and bad
//!   signatures all answer 401

pub mod error;
pub mod extractor;
pub mod identity;

pub use error::AuthError;
pub use extractor::{ClientIp, LoginIdentity, SsoCookie, SSO_COOKIE};
pub use identity::{AuthFailure, Authenticator, FixedIdentity, Identity};
