// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token data model.
//!
//! Field names on the wire are the single letters used by existing cookies
//! (`R`, `S`, `H`, `E`, `P`, `U`).

use p256::ecdsa::Signature;
use serde::{Deserialize, Serialize};

/// Width of a P-256 scalar in bytes.
pub const SCALAR_LEN: usize = 32;

/// Identity claim embedded in a token.
///
/// The username is opaque: no format constraints are enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(rename = "U")]
    pub username: String,
}

impl TokenPayload {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// The signed, transportable SSO token.
///
/// `hash` is informational only. Verification always recomputes the digest
/// from the request's client IP and the token's own `expiry` and `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// ECDSA signature `r`, 32-byte big-endian
    #[serde(rename = "R", with = "hex::serde")]
    pub signature_r: [u8; SCALAR_LEN],

    /// ECDSA signature `s`, 32-byte big-endian
    #[serde(rename = "S", with = "hex::serde")]
    pub signature_s: [u8; SCALAR_LEN],

    /// Digest computed at issuance
    #[serde(rename = "H", with = "hex::serde")]
    pub hash: Vec<u8>,

    /// Expiry as a signed 32-bit Unix timestamp (seconds)
    #[serde(rename = "E")]
    pub expiry: i32,

    #[serde(rename = "P")]
    pub payload: TokenPayload,
}

impl Token {
    /// Reassemble the ECDSA signature from its scalars.
    ///
    /// Fails when either scalar is zero or not below the curve order.
    pub fn signature(&self) -> Result<Signature, p256::ecdsa::Error> {
        Signature::from_scalars(self.signature_r, self.signature_s)
    }
}
