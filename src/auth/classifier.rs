// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path classification.
//!
//! ## Rules
//!
//! 1. An exact match in the public set wins, even when a protected prefix
//!    also matches.
//! 2. `OPTIONS` is always public; browsers send pre-flight requests without
//!    application headers.
//! 3. A path starting with any protected prefix requires a credential.
//! 4. Anything else is unclassified and **allowed without a credential**.
//!
//! Rule 4 is fail-open: a new endpoint outside the protected prefixes is
//! reachable anonymously until a prefix is added for it.

use std::collections::HashSet;

/// Exact paths that never require a credential.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &["/", "/health", "/docs", "/openapi.json", "/list-apps"];

/// Path prefixes that require a credential.
pub const DEFAULT_PROTECTED_PREFIXES: &[&str] = &["/apps/", "/run_sse", "/run"];

/// Outcome of classifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Explicitly public, or a pre-flight request
    Public,
    /// Matches a protected prefix
    Protected,
    /// No rule matched; allowed like `Public`
    Unclassified,
}

impl Classification {
    /// Whether the gate must check a credential.
    pub fn requires_credential(self) -> bool {
        self == Classification::Protected
    }
}

/// Static rule tables, built once at startup.
#[derive(Debug, Clone)]
pub struct PathRules {
    public_paths: HashSet<String>,
    protected_prefixes: Vec<String>,
}

impl PathRules {
    pub fn new<P, Q>(public_paths: P, protected_prefixes: Q) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        Q: IntoIterator,
        Q::Item: Into<String>,
    {
        Self {
            public_paths: public_paths.into_iter().map(Into::into).collect(),
            protected_prefixes: protected_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Classify a request path (query and fragment are ignored).
    pub fn classify(&self, path: &str, method: &str) -> Classification {
        let path = path_component(path);

        if self.public_paths.contains(path) || method == "OPTIONS" {
            return Classification::Public;
        }

        if self
            .protected_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            Classification::Protected
        } else {
            Classification::Unclassified
        }
    }

    pub fn public_paths(&self) -> impl Iterator<Item = &str> {
        self.public_paths.iter().map(String::as_str)
    }

    pub fn protected_prefixes(&self) -> impl Iterator<Item = &str> {
        self.protected_prefixes.iter().map(String::as_str)
    }
}

impl Default for PathRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_PUBLIC_PATHS.iter().copied(),
            DEFAULT_PROTECTED_PREFIXES.iter().copied(),
        )
    }
}

fn path_component(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(end) => &path[..end],
        None => path,
    }
}
