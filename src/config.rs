// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Command-line flags (each with an environment fallback) parsed once at
//! startup into an immutable [`Config`].
//!
//! ## Flags
//!
//! | Flag | Variable | Description | Default |
//! |------|----------|-------------|---------|
//! | `--bind` | `SSO_BIND` | Listen address | `127.0.0.1` |
//! | `--port` | `SSO_PORT` | Listen port | `8080` |
//! | `--real-ip` | `SSO_REAL_IP_HEADER` | Header carrying the client IP | `X-Real-Ip` |
//! | `--privkey` | `SSO_PRIVKEY` | PEM EC private key | `prime256v1-key.pem` |
//! | `--pubkey` | `SSO_PUBKEY` | PEM EC public key | derived from private key |
//! | `--digest` | `SSO_DIGEST` | Token digest (`sha256`, `sha1`) | `sha256` |
//! | `--token-ttl` | `SSO_TOKEN_TTL` | Token lifetime | `10s` |
//! | `--cookie-ttl` | `SSO_COOKIE_TTL` | Cookie lifetime | `365days` |
//! | `--demo-user` | `SSO_DEMO_USER` | Identity issued by `/login` | `jg123456` |
//! | `--log-format` | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//!
//! `RUST_LOG` filters log output, default `info,tower_http=debug`.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderName;
use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::state::SsoSettings;
use crate::token::DigestAlgorithm;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Longest accepted token or cookie lifetime (68 years keeps token expiries
/// inside the signed 32-bit range for the foreseeable future).
pub const MAX_TTL: Duration = Duration::from_secs(68 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be at most {} (got {})", humantime::format_duration(*max), humantime::format_duration(*got))]
    TtlTooLong {
        name: &'static str,
        got: Duration,
        max: Duration,
    },
}

/// SSO token issuer and verifier for reverse-proxy auth requests.
#[derive(Debug, Clone, Parser)]
#[command(name = "sso-gate", version, about)]
pub struct Config {
    /// Listen address
    #[arg(long, env = "SSO_BIND", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Listening port
    #[arg(long, env = "SSO_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Name of the header carrying the real client IP
    #[arg(long = "real-ip", env = "SSO_REAL_IP_HEADER", default_value = "X-Real-Ip")]
    pub ip_header: HeaderName,

    /// Filename of PEM-encoded ECC private key
    #[arg(long, env = "SSO_PRIVKEY", default_value = "prime256v1-key.pem")]
    pub privkey: PathBuf,

    /// Filename of PEM-encoded ECC public key (derived from the private key if omitted)
    #[arg(long, env = "SSO_PUBKEY")]
    pub pubkey: Option<PathBuf>,

    /// Hash function for the token digest
    #[arg(long, env = "SSO_DIGEST", value_enum, default_value_t = DigestAlgorithm::Sha256)]
    pub digest: DigestAlgorithm,

    /// Lifetime of issued tokens
    #[arg(long, env = "SSO_TOKEN_TTL", default_value = "10s", value_parser = humantime::parse_duration)]
    pub token_ttl: Duration,

    /// Lifetime of the sso cookie in the browser
    #[arg(long, env = "SSO_COOKIE_TTL", default_value = "365days", value_parser = humantime::parse_duration)]
    pub cookie_ttl: Duration,

    /// Username issued by /login
    #[arg(long, env = "SSO_DEMO_USER", default_value = "jg123456")]
    pub demo_user: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    /// Reject settings that could only fail later, per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, got) in [("token TTL", self.token_ttl), ("cookie TTL", self.cookie_ttl)] {
            if got > MAX_TTL {
                return Err(ConfigError::TtlTooLong {
                    name,
                    got,
                    max: MAX_TTL,
                });
            }
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn settings(&self) -> SsoSettings {
        SsoSettings {
            ip_header: self.ip_header.clone(),
            digest: self.digest,
            token_ttl: self.token_ttl,
            cookie_ttl: self.cookie_ttl,
        }
    }
}

/// Install the global tracing subscriber.
pub fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
