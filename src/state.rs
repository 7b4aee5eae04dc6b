// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::agent::{AgentRuntime, LocalRuntime};
use crate::auth::{Gate, JwtVerifier};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<Gate>,
    pub runtime: Arc<dyn AgentRuntime>,
}

impl AppState {
    pub fn new(gate: Gate, runtime: impl AgentRuntime + 'static) -> Self {
        Self {
            gate: Arc::new(gate),
            runtime: Arc::new(runtime),
        }
    }
}

impl Default for AppState {
    /// No signing secret and the default local runtime.
    fn default() -> Self {
        Self::new(Gate::with_verifier(JwtVerifier::new(None)), LocalRuntime::default())
    }
}
