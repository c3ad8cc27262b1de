// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # SSO Token Protocol
//!
//! A token binds an identity to the client IP it was issued for and to an
//! expiry instant, and carries an ECDSA P-256 signature over a digest of
//! those three values.
//!
//! ## Lifecycle
//!
//! 1. `/login` calls [`issue`] and stores [`encode`]d output in the `sso` cookie
//! 2. The client sends the cookie back through the reverse proxy
//! 3. `/auth` calls [`decode`] and then [`verify`] against the same client IP
//!
//! The server keeps no session state. Every instance sharing the key pair
//! (and digest algorithm) can verify every token.
//!
//! ## Digest Input
//!
//! `client_ip ++ decimal(expiry) ++ username`, concatenated without
//! separators. The lack of delimiters means field boundaries are ambiguous
//! in the hash pre-image; it is kept as-is for wire compatibility.

pub mod codec;
pub mod digest;
pub mod issuer;
pub mod model;
pub mod verifier;

pub use codec::{decode, encode, CodecError};
pub use digest::{compute_digest, DigestAlgorithm};
pub use issuer::{issue, IssueError};
pub use model::{Token, TokenPayload};
pub use verifier::{verify, Verification};
