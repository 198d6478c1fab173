use assessment_service::config::AssessmentConfig;
use assessment_service::services::init_metrics;
use assessment_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Must run before any metric is recorded.
    if let Err(e) = init_metrics() {
        eprintln!("Failed to install Prometheus recorder: {}", e);
    }

    let config = AssessmentConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "assessment-service",
        &config.common.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    tracing::info!("assessment-service started on port {}", application.port());
    application.run_until_stopped().await
}
