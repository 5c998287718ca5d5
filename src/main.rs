// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::category_registry::CategoryRegistry;
use crate::application::plot_registry::PlotRegistry;
use crate::application::report_service::FullReportService;
use crate::application::time_series_source::TimeSeriesSource;
use crate::infrastructure::config::load_report_config;
use crate::infrastructure::observation_source::HttpObservationSource;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let report_config = load_report_config()?;

    // Observation source (infrastructure layer)
    let source: Arc<dyn TimeSeriesSource> =
        Arc::new(HttpObservationSource::new(report_config.observations.host.clone()));

    // Page-wide plot state and the static category table
    let registry = Arc::new(PlotRegistry::new());
    let categories = CategoryRegistry::standard();

    // Report service (application layer)
    let report_service = FullReportService::from_config(&report_config, source, &categories, registry)?;
    let state = Arc::new(AppState { report_service });

    // Router (presentation layer)
    let router = build_router(state);

    let addr: SocketAddr = report_config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address {}", report_config.server.bind_address))?;
    tracing::info!("Starting nar-full-report service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
