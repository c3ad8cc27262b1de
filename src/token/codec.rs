// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cookie-safe token encoding: JSON, then percent-encoding.

use thiserror::Error;

use super::model::Token;

/// Token encoding/decoding errors.
///
/// Every decode variant is a client-side problem and maps to 401 at the edge.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Token could not be serialized
    #[error("failed to serialize token: {0}")]
    Encode(#[source] serde_json::Error),
    /// `%` not followed by two hex digits
    #[error("invalid percent-encoding at byte {0}")]
    PercentEncoding(usize),
    /// Percent-decoded bytes are not UTF-8
    #[error("cookie value is not valid UTF-8")]
    NotUtf8,
    /// JSON structure or field types do not match a token
    #[error("malformed token: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Serialize a token into a cookie value.
pub fn encode(token: &Token) -> Result<String, CodecError> {
    let json = serde_json::to_string(token).map_err(CodecError::Encode)?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// Parse a cookie value produced by [`encode`].
///
/// Either returns a fully populated token or fails; unknown fields are
/// ignored, missing fields are an error.
pub fn decode(text: &str) -> Result<Token, CodecError> {
    let json = unescape(text)?;
    serde_json::from_str(&json).map_err(CodecError::Malformed)
}

/// Strict query-unescape: `+` is a space and every `%` must start a valid
/// escape.
fn unescape(text: &str) -> Result<String, CodecError> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(CodecError::PercentEncoding(i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = text.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| CodecError::NotUtf8)
}
