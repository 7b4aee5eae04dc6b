// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::Method,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::gate_middleware,
    models::{AgentEvent, Content, Part, RunRequest},
    state::AppState,
};

pub mod agent;
pub mod health;

/// Build the application router.
///
/// Layers, outermost first: CORS (answers pre-flight requests), request id,
/// tracing, then the gate. The gate wraps the fallback too, so an unrouted
/// path under a protected prefix is still denied rather than 404'd.
pub fn router(state: AppState) -> Router {
    let gate = state.gate.clone();

    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/list-apps", get(agent::list_apps))
        .route("/run", post(agent::run))
        .route("/run_sse", post(agent::run_sse))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(gate, gate_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::index,
        health::liveness,
        health::readiness,
        agent::list_apps,
        agent::run,
        agent::run_sse
    ),
    components(
        schemas(
            RunRequest,
            AgentEvent,
            Content,
            Part,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::IndexResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Health", description = "Probes and service information"),
        (name = "Agents", description = "Agent execution behind the bearer-token gate")
    )
)]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
