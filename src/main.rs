// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use search_agent_server::{
    agent::LocalRuntime,
    api::{health::SERVICE_VERSION, router},
    auth::Gate,
    config::{LogFormat, ServerConfig, DEFAULT_LOG_FILTER, JWT_SECRET_ENV},
    state::AppState,
};

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    if config.jwt_secret.is_none() {
        warn!(
            "{JWT_SECRET_ENV} is not set; requests to protected paths will fail with 500 until it is configured"
        );
    }

    let gate = Gate::new(config.path_rules(), std::sync::Arc::new(config.verifier()));
    info!(
        public_paths = ?gate.rules().public_paths().collect::<Vec<_>>(),
        protected_prefixes = ?gate.rules().protected_prefixes().collect::<Vec<_>>(),
        "Gate configured; paths outside the protected prefixes are not authenticated"
    );

    let state = AppState::new(gate, LocalRuntime::new(config.agent_apps.clone()));
    let app = router(state);

    let addr = config.bind_addr();
    info!("Search agent server v{SERVICE_VERSION} listening on http://{addr} (docs at /docs)");

    if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
        error!("HTTP server failed: {e}");
        std::process::exit(1);
    }
}
