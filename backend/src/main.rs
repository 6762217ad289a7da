//! Health Calculators Backend
//!
//! The calculators run in the browser. This service hosts the one piece that
//! needs a server: the recommendation gateway in front of a text-generation
//! model. It also exposes health probes and Prometheus metrics.

use anyhow::Result;
use health_calculators_backend::{config, routes, services::OllamaGateway, state::AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting Health Calculators Backend"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    if config.ai.enabled {
        info!(url = %config.ai.ollama_url, model = %config.ai.model, "Recommendation upstream enabled");
    } else {
        warn!("Recommendation upstream disabled; /api/v1/recommendations will return 503");
    }

    let metrics = PrometheusBuilder::new().install_recorder()?;
    let gateway = Arc::new(OllamaGateway::new(config.ai.clone())?);
    let state = AppState::new(config.clone(), gateway, metrics);

    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "health_calculators_backend=info,tower_http=info".into()
        } else {
            "health_calculators_backend=debug,health_calculators_shared=debug,tower_http=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.ai.enabled && config.ai.model.trim().is_empty() {
        errors.push("AI model must be set when recommendations are enabled");
    }
    if config.ai.timeout_secs == 0 {
        errors.push("AI timeout must be greater than zero");
    }

    if config.ai.ollama_url.contains("localhost") || config.ai.ollama_url.contains("127.0.0.1") {
        warn!("Ollama URL points at localhost - ensure this is intentional for production");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
