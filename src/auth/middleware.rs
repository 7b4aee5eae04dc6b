// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum middleware that runs the [`Gate`] on every request.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/run", post(run))
//!     .layer(axum::middleware::from_fn_with_state(gate, gate_middleware));
//! ```
//!
//! Allowed requests continue with the [`Identity`](super::Identity), if any,
//! stored in the request extensions. Denied requests never reach the inner
//! service.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, warn};

use super::gate::{AccessDecision, Gate};
use super::AuthError;

/// Authentication middleware function.
pub async fn gate_middleware(
    State(gate): State<Arc<Gate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let method = request.method().as_str().to_owned();

    // Non-UTF-8 bytes cannot form a valid token; keep them so the verifier
    // reports `Invalid` instead of hiding the header.
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    let (classification, decision) = gate.evaluate(&path, &method, header.as_deref());

    match decision {
        AccessDecision::Allow(None) => {
            debug!(%path, %method, ?classification, "Skipping credential check");
            next.run(request).await
        }
        AccessDecision::Allow(Some(identity)) => {
            info!(
                %path,
                %method,
                subject_id = identity.subject_id.as_deref().unwrap_or("<none>"),
                "Credential accepted"
            );
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        AccessDecision::Deny(e) => {
            match &e {
                AuthError::MisconfiguredSecret => {
                    error!(%path, %method, error_code = e.error_code(), "JWT secret not configured")
                }
                AuthError::UnexpectedFault(detail) => {
                    error!(%path, %method, error_code = e.error_code(), %detail, "Credential check faulted")
                }
                _ => warn!(%path, %method, error_code = e.error_code(), "Request denied"),
            }
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verifier::tests::{sign, standard_claims, TEST_SECRET};
    use crate::auth::{Identity, JwtVerifier, SigningSecret};
    use axum::{
        body::{to_bytes, Body},
        http::{header, HeaderValue, Method, Request, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use tower::ServiceExt;

    async fn echo_identity(request: Request<Body>) -> Json<Option<Identity>> {
        Json(request.extensions().get::<Identity>().cloned())
    }

    fn app() -> Router {
        let gate = Arc::new(Gate::with_verifier(JwtVerifier::new(SigningSecret::new(
            TEST_SECRET,
        ))));
        Router::new()
            .route("/run", post(echo_identity))
            .route("/health", get(echo_identity))
            .layer(axum::middleware::from_fn_with_state(gate, gate_middleware))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn denied_request_never_reaches_handler() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/run")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Authorization header required" })
        );
    }

    #[tokio::test]
    async fn allowed_request_carries_identity() {
        let token = sign(&standard_claims(), TEST_SECRET);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/run")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["subject_id"], "123");
        assert_eq!(body["tier"], "premium");
    }

    #[tokio::test]
    async fn public_request_has_no_identity_even_with_token() {
        let token = sign(&standard_claims(), TEST_SECRET);
        let request = Request::builder()
            .uri("/health")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn non_utf8_header_is_an_invalid_token() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/run")
            .header(
                AUTHORIZATION,
                HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
            )
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Invalid token");
    }

    #[tokio::test]
    async fn unrouted_protected_path_is_still_gated() {
        let request = Request::builder()
            .uri("/apps/search_agent/users/1/sessions")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
