// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the caller identity built from them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Claims read from a verified token payload.
///
/// Every field is optional and kept as raw JSON so that a claim of an
/// unexpected type never turns a correctly signed token into a failure.
/// Claims not listed here are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    /// Caller identifier
    #[serde(default)]
    pub id: Option<Value>,

    /// Human-readable name
    #[serde(default)]
    pub username: Option<Value>,

    /// Contact address (not validated)
    #[serde(default)]
    pub email: Option<Value>,

    /// Plan / category label
    #[serde(default)]
    pub tier: Option<Value>,

    /// Hint for the caller's next state refresh
    #[serde(default)]
    pub next_activity_update: Option<Value>,

    /// Expiry, checked by the verifier. An explicit `null` is kept as
    /// `Some(Value::Null)` so it can be told apart from an absent claim.
    #[serde(default, deserialize_with = "present")]
    pub exp: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Authenticated caller attached to a request by the gate.
///
/// Only the token verifier constructs this, and only after the signature and
/// expiry checks pass. It lives in the request extensions for the duration of
/// one request and is never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    /// Opaque caller identifier (`id` claim)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    /// Display name (`username` claim)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Email (`email` claim)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Plan label (`tier` claim), consumed by downstream rate limiting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,

    /// `next_activity_update` claim, passed through unmodified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_hint: Option<Value>,
}

impl Identity {
    /// Build from verified claims.
    pub(crate) fn from_claims(claims: TokenClaims) -> Self {
        Self {
            subject_id: claim_text(claims.id),
            display_name: claim_text(claims.username),
            email: claim_text(claims.email),
            tier: claim_text(claims.tier),
            refresh_hint: claims.next_activity_update.filter(|v| !v.is_null()),
        }
    }
}

/// Render a scalar claim as text; `null` counts as absent.
fn claim_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
