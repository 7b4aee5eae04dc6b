// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the agent endpoints behind the gate. All
//! types derive `ToSchema` so they appear in the OpenAPI document.
//!
//! Field names are snake_case on the wire; the camelCase spellings sent by
//! some agent clients are accepted as aliases.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Message Content
// =============================================================================

/// One piece of a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A message exchanged with an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Content {
    /// `user` for caller messages, `model` for agent replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }

    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

// =============================================================================
// Run Models
// =============================================================================

/// Request to run an agent on a new message.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RunRequest {
    #[serde(alias = "appName")]
    pub app_name: String,
    #[serde(alias = "userId")]
    pub user_id: String,
    #[serde(alias = "sessionId")]
    pub session_id: String,
    #[serde(alias = "newMessage")]
    pub new_message: Content,
    #[serde(default)]
    pub streaming: bool,
}

/// An event emitted by an agent during a run.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct AgentEvent {
    pub id: String,
    pub invocation_id: String,
    pub author: String,
    pub content: Content,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
}
