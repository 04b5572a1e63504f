mod analysis;
mod config;
mod errors;
mod models;
mod repository;
mod routes;
mod state;
mod stats;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::repository::HttpRecordRepository;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::{AdminCredentials, ReviewWorkflow, WorkflowSettings};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Review Console v{}", env!("CARGO_PKG_VERSION"));

    // Upstream screening service
    let repository = HttpRecordRepository::new(
        config.upstream_base_url.clone(),
        Duration::from_secs(config.upstream_timeout_secs),
    )?;
    info!("Upstream repository initialized ({})", config.upstream_base_url);

    let workflow = ReviewWorkflow::new(
        Arc::new(repository),
        AdminCredentials::new(config.admin_username.clone(), config.admin_password.clone()),
        WorkflowSettings {
            session_ttl: chrono::Duration::minutes(config.session_ttl_minutes),
            max_upload_bytes: config.max_upload_bytes,
        },
    );
    info!(
        "Review workflow ready (session TTL {} min, upload limit {} bytes)",
        config.session_ttl_minutes, config.max_upload_bytes
    );

    // Build app state
    let state = AppState {
        workflow: Arc::new(workflow),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the console's own origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
