// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use p256::ecdsa::signature::hazmat::RandomizedPrehashSigner;
use p256::ecdsa::{Signature, SigningKey};
use p256::elliptic_curve::rand_core::OsRng;
use thiserror::Error;

use super::digest::{compute_digest, DigestAlgorithm};
use super::model::{Token, TokenPayload};

/// Issuance failures. Fatal to the request, never to the process.
#[derive(Debug, Error)]
pub enum IssueError {
    /// `now + ttl` does not fit a signed 32-bit Unix timestamp
    #[error("token expiry is outside the 32-bit timestamp range")]
    ExpiryOutOfRange,
    /// The signature primitive failed
    #[error("failed to sign token: {0}")]
    Signing(#[source] p256::ecdsa::Error),
}

/// Mint a token for `payload`, bound to `client_ip`, valid until `now + ttl`.
///
/// The nonce is hedged: RFC 6979 derivation mixed with fresh OS randomness,
/// so two tokens for identical inputs carry different signatures.
pub fn issue(
    client_ip: &str,
    payload: TokenPayload,
    now: DateTime<Utc>,
    ttl: Duration,
    key: &SigningKey,
    algorithm: DigestAlgorithm,
) -> Result<Token, IssueError> {
    let expiry = expiry_after(now, ttl)?;
    let hash = compute_digest(algorithm, client_ip, expiry, &payload.username);

    let signature: Signature = key
        .sign_prehash_with_rng(&mut OsRng, &hash)
        .map_err(IssueError::Signing)?;
    let (r, s) = signature.split_bytes();

    Ok(Token {
        signature_r: r.into(),
        signature_s: s.into(),
        hash,
        expiry,
        payload,
    })
}

/// `now + ttl` in whole seconds, checked against the i32 range.
fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> Result<i32, IssueError> {
    let expires_at = TimeDelta::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(IssueError::ExpiryOutOfRange)?;

    i32::try_from(expires_at.timestamp()).map_err(|_| IssueError::ExpiryOutOfRange)
}
