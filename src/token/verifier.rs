// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification.

use chrono::{DateTime, Utc};
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::VerifyingKey;
use tracing::debug;

use super::digest::{compute_digest, DigestAlgorithm};
use super::model::{Token, TokenPayload};

/// Outcome of checking a token against a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid(TokenPayload),
    Expired,
    InvalidSignature,
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid(_))
    }
}

/// Decide whether `token` is currently valid for `client_ip`.
///
/// Checks, in order: expiry (valid through the expiry second inclusive),
/// then the signature over the recomputed digest. The token's embedded
/// `hash` is never trusted.
pub fn verify(
    client_ip: &str,
    token: &Token,
    now: DateTime<Utc>,
    key: &VerifyingKey,
    algorithm: DigestAlgorithm,
) -> Verification {
    if now.timestamp() > i64::from(token.expiry) {
        return Verification::Expired;
    }

    let digest = compute_digest(algorithm, client_ip, token.expiry, &token.payload.username);
    if digest != token.hash {
        debug!(
            embedded = %hex::encode(&token.hash),
            recomputed = %hex::encode(&digest),
            "Embedded token hash differs from recomputed digest"
        );
    }

    let Ok(signature) = token.signature() else {
        return Verification::InvalidSignature;
    };

    match key.verify_prehash(&digest, &signature) {
        Ok(()) => Verification::Valid(token.payload.clone()),
        Err(_) => Verification::InvalidSignature,
    }
}
