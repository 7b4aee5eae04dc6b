// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gate errors.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Methods advertised on denial responses.
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, OPTIONS";

/// Reason a request was refused by the gate.
///
/// The `Display` text is the exact message returned to the caller; the
/// taxonomy is closed so the gate can match it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or an empty one
    #[error("Authorization header required")]
    MissingHeader,
    /// Header present but not using the `Bearer ` scheme
    #[error("Authorization header must start with 'Bearer '")]
    MalformedHeader,
    /// No signing secret configured for this process
    #[error("JWT secret not configured")]
    MisconfiguredSecret,
    /// Signature valid but `exp` is in the past
    #[error("Token has expired")]
    Expired,
    /// Bad signature, bad structure or disallowed algorithm
    #[error("Invalid token")]
    Invalid,
    /// Verification faulted in a way nothing else covers
    #[error("Invalid authentication")]
    UnexpectedFault(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    /// Stable machine-readable code, used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::MisconfiguredSecret => "misconfigured_secret",
            AuthError::Expired => "token_expired",
            AuthError::Invalid => "invalid_token",
            AuthError::UnexpectedFault(_) => "unexpected_fault",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader
            | AuthError::Expired
            | AuthError::Invalid
            | AuthError::UnexpectedFault(_) => StatusCode::UNAUTHORIZED,
            AuthError::MisconfiguredSecret => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
        });

        let mut response = (status, body).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("*"),
        );
        response
    }
}
