//! Customer Churn Prediction - Main Entry Point
//!
//! Loads the fitted artifacts once, then serves the prediction form and
//! JSON API until interrupted.

use anyhow::{Context, Result};
use churn_prediction::{
    config::{AppConfig, LoggingConfig},
    metrics::{MetricsReporter, PredictionMetrics},
    models::ArtifactLoader,
    web::{create_router, AppState},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("churn_prediction={0},tower_http={0}", logging.level)))
        .context("Invalid log level")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Customer Churn Prediction service");
    info!(
        "Decision threshold: {:.2}, Risk levels: medium>={:.2}, high>={:.2}, critical>={:.2}",
        config.decision.threshold,
        config.decision.risk_levels.medium,
        config.decision.risk_levels.high,
        config.decision.risk_levels.critical
    );

    // Load artifacts; any failure here is fatal
    let predictor = ArtifactLoader::new(&config)
        .load_all()
        .context("Failed to load model artifacts")?;
    info!(
        "Feature assembler ready ({} features): {:?}",
        predictor.assembler().width(),
        predictor.assembler().column_names()
    );

    let metrics = Arc::new(PredictionMetrics::new());

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let state = AppState::new(Arc::new(predictor), metrics.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Print final summary
    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}
