// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The gate: classification followed, on protected paths, by verification.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::classifier::{Classification, PathRules};
use super::verifier::{extract_bearer, CredentialVerifier, JwtVerifier};
use super::{AuthError, Identity};

/// Result of gating one request.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    /// Forward the request; the identity is present only for protected paths.
    Allow(Option<Identity>),
    /// Short-circuit with the error's status and message.
    Deny(AuthError),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow(_))
    }
}

/// Pass/fail checkpoint in front of the agent handlers.
///
/// Holds only immutable state, so one instance is shared by every request.
#[derive(Clone)]
pub struct Gate {
    rules: PathRules,
    verifier: Arc<dyn CredentialVerifier>,
}

impl Gate {
    pub fn new(rules: PathRules, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { rules, verifier }
    }

    /// Gate with the default rule tables and an HS256 verifier.
    pub fn with_verifier(verifier: JwtVerifier) -> Self {
        Self::new(PathRules::default(), Arc::new(verifier))
    }

    pub fn rules(&self) -> &PathRules {
        &self.rules
    }

    /// Whether protected requests can succeed at all.
    pub fn is_configured(&self) -> bool {
        self.verifier.is_configured()
    }

    /// Decide whether a request may proceed.
    ///
    /// The header is only looked at for protected paths. A panic raised by
    /// the verifier is contained here and reported as
    /// [`AuthError::UnexpectedFault`].
    pub fn decide(&self, path: &str, method: &str, header: Option<&str>) -> AccessDecision {
        self.evaluate(path, method, header).1
    }

    /// [`decide`](Self::decide), also returning the classification the
    /// decision was based on.
    pub fn evaluate(
        &self,
        path: &str,
        method: &str,
        header: Option<&str>,
    ) -> (Classification, AccessDecision) {
        let classification = self.rules.classify(path, method);
        if !classification.requires_credential() {
            return (classification, AccessDecision::Allow(None));
        }

        let token = match extract_bearer(header) {
            Ok(token) => token,
            Err(e) => return (classification, AccessDecision::Deny(e)),
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| self.verifier.verify(token)))
            .unwrap_or_else(|panic| Err(AuthError::UnexpectedFault(panic_message(&*panic))));

        let decision = match outcome {
            Ok(identity) => AccessDecision::Allow(Some(identity)),
            Err(e) => AccessDecision::Deny(e),
        };
        (classification, decision)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "verifier panicked".to_string()
    }
}
