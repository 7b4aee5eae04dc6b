// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`ServerConfig`] loaded once
//! at startup. A `.env` file in the working directory is read first (see
//! `main.rs`); real environment variables take precedence.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 secret shared with the identity provider | unset (protected requests get 500) |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance for `exp` / `nbf` | `0` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `GATE_PUBLIC_PATHS` | Comma-separated exact public paths | `/,/health,/docs,/openapi.json,/list-apps` |
//! | `GATE_PROTECTED_PREFIXES` | Comma-separated protected prefixes | `/apps/,/run_sse,/run` |
//! | `AGENT_APPS` | Comma-separated agent app names | `search_agent` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::auth::{
    classifier::{DEFAULT_PROTECTED_PREFIXES, DEFAULT_PUBLIC_PATHS},
    verifier::DEFAULT_LEEWAY_SECS,
    JwtVerifier, PathRules, SigningSecret,
};

/// Environment variable holding the token signing secret.
///
/// Absence does not stop the server; it only makes every protected request
/// fail with 500 until the secret is provided and the process restarted.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable for the clock skew tolerance in seconds.
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding the public exact-path set.
pub const PUBLIC_PATHS_ENV: &str = "GATE_PUBLIC_PATHS";

/// Environment variable overriding the protected prefix list.
pub const PROTECTED_PREFIXES_ENV: &str = "GATE_PROTECTED_PREFIXES";

/// Environment variable listing the apps served by the local agent runtime.
pub const AGENT_APPS_ENV: &str = "AGENT_APPS";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_AGENT_APP: &str = "search_agent";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configuration errors detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidValue {
                name: LOG_FORMAT_ENV,
                value: s.to_string(),
            }),
        }
    }
}

/// Process-wide configuration, read once at startup and immutable after.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub log_format: LogFormat,
    pub jwt_secret: Option<SigningSecret>,
    pub jwt_leeway_secs: u64,
    pub public_paths: Vec<String>,
    pub protected_prefixes: Vec<String>,
    pub agent_apps: Vec<String>,
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = match get(HOST_ENV) {
            Some(v) => parse(HOST_ENV, &v)?,
            None => parse(HOST_ENV, DEFAULT_HOST)?,
        };
        let port = match get(PORT_ENV) {
            Some(v) => parse(PORT_ENV, &v)?,
            None => DEFAULT_PORT,
        };
        let log_format = match get(LOG_FORMAT_ENV) {
            Some(v) => v.parse()?,
            None => LogFormat::default(),
        };
        let jwt_leeway_secs = match get(JWT_LEEWAY_ENV) {
            Some(v) => parse(JWT_LEEWAY_ENV, &v)?,
            None => DEFAULT_LEEWAY_SECS,
        };

        Ok(Self {
            host,
            port,
            log_format,
            jwt_secret: lookup(JWT_SECRET_ENV).and_then(SigningSecret::new),
            jwt_leeway_secs,
            public_paths: list_or(get(PUBLIC_PATHS_ENV), DEFAULT_PUBLIC_PATHS),
            protected_prefixes: list_or(get(PROTECTED_PREFIXES_ENV), DEFAULT_PROTECTED_PREFIXES),
            agent_apps: list_or(get(AGENT_APPS_ENV), &[DEFAULT_AGENT_APP]),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn path_rules(&self) -> PathRules {
        PathRules::new(self.public_paths.iter().cloned(), self.protected_prefixes.iter().cloned())
    }

    pub fn verifier(&self) -> JwtVerifier {
        JwtVerifier::new(self.jwt_secret.clone()).with_leeway(self.jwt_leeway_secs)
    }
}

fn parse<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn list_or(value: Option<String>, default: &[&str]) -> Vec<String> {
    match value {
        Some(v) => v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}
