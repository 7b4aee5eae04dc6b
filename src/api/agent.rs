// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Agent endpoints.
//!
//! `/run` and `/run_sse` sit under protected prefixes, so the gate has
//! already verified the caller by the time these handlers run.

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    Json,
};
use futures_util::stream::{self, Stream};

use crate::{
    agent::RuntimeError,
    auth::Caller,
    models::{AgentEvent, RunRequest},
    state::AppState,
};

/// List the apps the agent runtime serves.
#[utoipa::path(
    get,
    path = "/list-apps",
    tag = "Agents",
    responses(
        (status = 200, description = "App names", body = Vec<String>)
    )
)]
pub async fn list_apps(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.runtime.list_apps())
}

/// Run an agent and return all events at once.
#[utoipa::path(
    post,
    path = "/run",
    tag = "Agents",
    security(("bearer" = [])),
    request_body = RunRequest,
    responses(
        (status = 200, description = "Events produced by the run", body = Vec<AgentEvent>),
        (status = 401, description = "Missing, malformed, invalid or expired token"),
        (status = 404, description = "Unknown app"),
        (status = 500, description = "JWT secret not configured"),
    )
)]
pub async fn run(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<RunRequest>,
) -> Result<Json<Vec<AgentEvent>>, RuntimeError> {
    let events = state.runtime.run(&caller, request)?;
    Ok(Json(events))
}

/// Run an agent and return the events as a server-sent event stream.
#[utoipa::path(
    post,
    path = "/run_sse",
    tag = "Agents",
    security(("bearer" = [])),
    request_body = RunRequest,
    responses(
        (status = 200, description = "Run events as `data:` lines", body = String, content_type = "text/event-stream"),
        (status = 401, description = "Missing, malformed, invalid or expired token"),
        (status = 404, description = "Unknown app"),
        (status = 500, description = "JWT secret not configured"),
    )
)]
pub async fn run_sse(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<RunRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, RuntimeError> {
    let events = state.runtime.run(&caller, request)?;
    let stream = stream::iter(
        events
            .into_iter()
            .map(|event| Event::default().json_data(event)),
    );
    Ok(Sse::new(stream))
}
