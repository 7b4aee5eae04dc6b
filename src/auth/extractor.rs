// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the identity attached by the gate.
//!
//! ```rust,ignore
//! async fn run(Caller(identity): Caller, Json(body): Json<RunRequest>) -> impl IntoResponse {
//!     // identity.subject_id, identity.tier, ...
//! }
//! ```
//!
//! These never verify tokens themselves; they only read what
//! [`gate_middleware`](super::middleware::gate_middleware) stored.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
};

use super::{AuthError, Identity};

/// Identity of a caller on a protected route.
///
/// Rejects with [`AuthError::UnexpectedFault`] when the gate did not attach an
/// identity, which only happens if a handler needing one is mounted on a path
/// the gate does not protect.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| {
                AuthError::UnexpectedFault(format!(
                    "no identity attached for {}",
                    parts.uri.path()
                ))
            })
    }
}

impl<S> OptionalFromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().map(Caller))
    }
}
