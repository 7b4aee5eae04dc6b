// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token gate for the agent API.
//!
//! ## Flow
//!
//! 1. The identity provider issues an HS256 JWT signed with `JWT_SECRET`
//! 2. The client sends `Authorization: Bearer <JWT>`
//! 3. For every request the gate:
//!    - classifies the path (public, protected, unclassified)
//!    - on protected paths, extracts and verifies the token
//!    - attaches an [`Identity`] built from the `id`, `username`, `email`,
//!      `tier` and `next_activity_update` claims
//!
//! ## Security
//!
//! - Paths outside the protected prefixes are **not** authenticated
//! - `OPTIONS` is never gated
//! - Every denial is a JSON `{"error": ...}` body with permissive CORS headers
//! - A missing secret denies protected requests with 500, never lets them through

pub mod claims;
pub mod classifier;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod middleware;
pub mod verifier;

pub use claims::Identity;
pub use classifier::{Classification, PathRules};
pub use error::AuthError;
pub use extractor::Caller;
pub use gate::{AccessDecision, Gate};
pub use middleware::gate_middleware;
pub use verifier::{extract_bearer, CredentialVerifier, JwtVerifier, SigningSecret};
