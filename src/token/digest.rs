// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical digest over `(client_ip, expiry, username)`.
//!
//! Issuer and verifier must agree bit-for-bit on this input, so both go
//! through [`compute_digest`].

use std::fmt;

use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

/// Hash function used for the token digest.
///
/// `Sha256` is the default for new deployments. `Sha1` exists only to keep
/// accepting tokens minted by deployments that predate the switch; SHA-1 is
/// collision-susceptible and should not be chosen otherwise. The choice is a
/// deployment setting and is not recorded inside the token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Sha1,
}

impl DigestAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha1 => "sha1",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hash `client_ip ++ decimal(expiry) ++ username`.
///
/// No delimiters are inserted between the fields.
pub fn compute_digest(
    algorithm: DigestAlgorithm,
    client_ip: &str,
    expiry: i32,
    username: &str,
) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha256 => digest_fields::<Sha256>(client_ip, expiry, username),
        DigestAlgorithm::Sha1 => digest_fields::<Sha1>(client_ip, expiry, username),
    }
}

fn digest_fields<D: Digest>(client_ip: &str, expiry: i32, username: &str) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(client_ip.as_bytes());
    hasher.update(expiry.to_string().as_bytes());
    hasher.update(username.as_bytes());
    hasher.finalize().to_vec()
}
