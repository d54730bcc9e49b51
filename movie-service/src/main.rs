use movie_service::config::MovieConfig;
use movie_service::services::init_metrics;
use movie_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = MovieConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    service_core::observability::init_tracing(
        "movie-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    )
    .map_err(|e| std::io::Error::other(format!("Tracing initialization error: {}", e)))?;

    // Metrics recorder must be installed before any metrics are recorded
    init_metrics().map_err(|e| {
        tracing::error!("Failed to initialize metrics: {}", e);
        std::io::Error::other(format!("Metrics initialization error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
