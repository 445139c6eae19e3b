// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::pipeline::PipelineContext;
use crate::application::settings_service::SettingsService;
use crate::application::store::Store;
use crate::infrastructure::config::load_server_config;
use crate::infrastructure::file_store::FileStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_dashboard, get_summary, health_check, list_machines, machine_metrics, put_heating,
    put_settings, put_tables,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_server_config()?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Create store (infrastructure layer)
    let file_store = FileStore::open(config.store_dir.clone()).await?;
    tracing::info!("Using file store at {}", file_store.root().display());
    let store: Arc<dyn Store> = Arc::new(file_store);

    // Build the pipeline from whatever is already stored
    let pipeline = Arc::new(PipelineContext::new(store));
    if config.seed_files.is_empty() {
        pipeline.reingest().await?;
    } else {
        pipeline.load_files(&config.seed_files).await?;
    }

    // Create application state
    let state = Arc::new(AppState {
        pipeline: pipeline.clone(),
        dashboard_service: DashboardService::new(pipeline.clone(), config.max_chart_points),
        settings_service: SettingsService::new(pipeline),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/machines", get(list_machines))
        .route("/machines/:id/metrics", get(machine_metrics))
        .route("/dashboard", get(get_dashboard))
        .route("/summary", get(get_summary))
        .route("/tables", put(put_tables))
        .route("/heating", put(put_heating))
        .route("/settings", put(put_settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind_addr {}", config.bind_addr))?;
    tracing::info!("Starting machine-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
