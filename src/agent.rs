// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Agent runtime seam.
//!
//! The reasoning/tool-use engine lives outside this crate. Handlers talk to it
//! through [`AgentRuntime`]; [`LocalRuntime`] is the bundled stand-in that
//! acknowledges each run so the gate can be exercised end to end.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::auth::Identity;
use crate::models::{AgentEvent, Content, RunRequest};

/// Why a run was refused by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("App not found: {0}")]
    UnknownApp(String),

    #[error("new_message must contain text")]
    EmptyMessage,
}

impl RuntimeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RuntimeError::UnknownApp(_) => StatusCode::NOT_FOUND,
            RuntimeError::EmptyMessage => StatusCode::BAD_REQUEST,
        }
    }
}

/// Same `{"error": ...}` body shape as a gate denial.
impl IntoResponse for RuntimeError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Downstream agent engine reached after the gate allows a request.
pub trait AgentRuntime: Send + Sync {
    /// Names of the apps this runtime can serve.
    fn list_apps(&self) -> Vec<String>;

    /// Run an app on a new message on behalf of `caller`.
    fn run(
        &self,
        caller: &Identity,
        request: RunRequest,
    ) -> Result<Vec<AgentEvent>, RuntimeError>;
}

/// Runtime that answers every run with a single acknowledgement event.
#[derive(Debug, Clone)]
pub struct LocalRuntime {
    apps: Vec<String>,
}

impl LocalRuntime {
    pub fn new(apps: Vec<String>) -> Self {
        Self { apps }
    }
}

impl Default for LocalRuntime {
    fn default() -> Self {
        Self::new(vec![crate::config::DEFAULT_AGENT_APP.to_string()])
    }
}

impl AgentRuntime for LocalRuntime {
    fn list_apps(&self) -> Vec<String> {
        self.apps.clone()
    }

    fn run(
        &self,
        caller: &Identity,
        request: RunRequest,
    ) -> Result<Vec<AgentEvent>, RuntimeError> {
        if !self.apps.contains(&request.app_name) {
            return Err(RuntimeError::UnknownApp(request.app_name));
        }

        let text = request.new_message.text();
        if text.trim().is_empty() {
            return Err(RuntimeError::EmptyMessage);
        }

        let name = caller
            .display_name
            .as_deref()
            .or(caller.subject_id.as_deref())
            .unwrap_or("caller");

        let now = Utc::now();
        Ok(vec![AgentEvent {
            id: Uuid::new_v4().to_string(),
            invocation_id: format!("e-{}", Uuid::new_v4()),
            author: request.app_name,
            content: Content::model_text(format!("Received from {name}: {text}")),
            timestamp: now.timestamp_millis() as f64 / 1000.0,
        }])
    }
}
