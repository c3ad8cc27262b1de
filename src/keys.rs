// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Key Material
//!
//! The issuer's P-256 key pair, loaded once at startup from PEM files and
//! shared read-only by the token issuer and verifier for the lifetime of the
//! process.
//!
//! ## Accepted Formats
//!
//! | Key | PEM label | Encoding |
//! |-----|-----------|----------|
//! | Private | `EC PRIVATE KEY` | SEC1 (`openssl ecparam -genkey`) |
//! | Private | `PRIVATE KEY` | PKCS#8 |
//! | Public | `PUBLIC KEY` | SPKI |
//!
//! `EC PARAMETERS` blocks that `openssl ecparam` writes in front of the key
//! are skipped.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use p256::ecdsa::{SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey};
use p256::{PublicKey, SecretKey};
use thiserror::Error;

const SEC1_PRIVATE_KEY_TAG: &str = "EC PRIVATE KEY";
const PKCS8_PRIVATE_KEY_TAG: &str = "PRIVATE KEY";
const PUBLIC_KEY_TAG: &str = "PUBLIC KEY";

/// Errors raised while loading key material.
///
/// All of them are fatal at startup: the service has no degraded mode
/// without its keys.
#[derive(Debug, Error)]
pub enum KeyFormatError {
    /// Key file missing or unreadable
    #[error("cannot read key file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Input is not a PEM document
    #[error("not a PEM document: {0}")]
    Pem(#[from] pem::PemError),
    /// PEM parsed, but no block with a usable label
    #[error("no {expected} block found in PEM document")]
    MissingBlock { expected: &'static str },
    /// Block contents are not a P-256 key
    #[error("invalid P-256 key: {0}")]
    Key(String),
    /// Configured public key does not belong to the private key
    #[error("public key does not correspond to the private key")]
    Mismatch,
}

/// The issuer's key pair.
///
/// Immutable after construction. The private half never leaves the process
/// and is redacted from `Debug` output.
#[derive(Clone)]
pub struct KeyMaterial {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyMaterial {
    /// Build from a private key, deriving the public key from it.
    pub fn new(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key().clone();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Build from an independently loaded key pair.
    ///
    /// Fails with [`KeyFormatError::Mismatch`] when the public key is not the
    /// one derived from `signing_key`; such a pair would reject every token.
    pub fn with_public_key(
        signing_key: SigningKey,
        verifying_key: VerifyingKey,
    ) -> Result<Self, KeyFormatError> {
        if signing_key.verifying_key() != &verifying_key {
            return Err(KeyFormatError::Mismatch);
        }
        Ok(Self {
            signing_key,
            verifying_key,
        })
    }

    /// Load the key pair from PEM files.
    ///
    /// `public_path` is optional; without it the public key is derived.
    pub fn load(private_path: &Path, public_path: Option<&Path>) -> Result<Self, KeyFormatError> {
        let signing_key = load_private_key(&read_key_file(private_path)?)?;
        match public_path {
            Some(path) => {
                let verifying_key = load_public_key(&read_key_file(path)?)?;
                Self::with_public_key(signing_key, verifying_key)
            }
            None => Ok(Self::new(signing_key)),
        }
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Hex of the compressed SEC1 public key, for logs and health output.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying_key.to_encoded_point(true).as_bytes())
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("signing_key", &"<redacted>")
            .field("public_key", &self.public_key_hex())
            .finish()
    }
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, KeyFormatError> {
    fs::read(path).map_err(|source| KeyFormatError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a PEM-encoded P-256 private key (SEC1 or PKCS#8).
pub fn load_private_key(pem_bytes: &[u8]) -> Result<SigningKey, KeyFormatError> {
    let blocks = pem::parse_many(pem_bytes)?;

    let secret_key = blocks
        .iter()
        .find_map(|block| match block.tag() {
            SEC1_PRIVATE_KEY_TAG => Some(
                SecretKey::from_sec1_der(block.contents()).map_err(|e| e.to_string()),
            ),
            PKCS8_PRIVATE_KEY_TAG => Some(
                SecretKey::from_pkcs8_der(block.contents()).map_err(|e| e.to_string()),
            ),
            _ => None,
        })
        .ok_or(KeyFormatError::MissingBlock {
            expected: SEC1_PRIVATE_KEY_TAG,
        })?
        .map_err(KeyFormatError::Key)?;

    Ok(SigningKey::from(secret_key))
}

/// Parse a PEM-encoded SPKI P-256 public key.
pub fn load_public_key(pem_bytes: &[u8]) -> Result<VerifyingKey, KeyFormatError> {
    let blocks = pem::parse_many(pem_bytes)?;

    let block = blocks
        .iter()
        .find(|block| block.tag() == PUBLIC_KEY_TAG)
        .ok_or(KeyFormatError::MissingBlock {
            expected: PUBLIC_KEY_TAG,
        })?;

    let public_key = PublicKey::from_public_key_der(block.contents())
        .map_err(|e| KeyFormatError::Key(e.to_string()))?;

    Ok(VerifyingKey::from(public_key))
}
