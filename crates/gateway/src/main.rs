use anyhow::Context;
use common::{TelemetryGuard, setup_logging};
use gateway::{AppState, config::get_configuration, router};
use inference::{ModelRegistry, OrtBackend};
use tokio::net::TcpListener;

const SERVICE_NAME: &str = "classifier-gateway";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration().context("Failed to load configuration")?;

    let _telemetry = match &config.otel_endpoint {
        Some(endpoint) => Some(TelemetryGuard::init(
            SERVICE_NAME,
            endpoint,
            config.log_level,
            config.environment,
        )?),
        None => {
            setup_logging(config.log_level, config.environment);
            None
        }
    };

    tracing::info!(
        environment = config.environment.as_str(),
        bind_addr = %config.bind_addr,
        "Classifier gateway starting"
    );

    let specs = config.model_specs()?;
    let options = config.load_options();
    let registry =
        tokio::task::spawn_blocking(move || ModelRegistry::<OrtBackend>::load(&specs, &options))
            .await?;

    if registry.available_count() == 0 {
        tracing::warn!("No model could be loaded; uploads will return empty results");
    }

    let state = AppState::new(
        registry,
        config.comparison_image.clone(),
        config.max_upload_bytes,
    )?;

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Classifier gateway listening on {}", config.bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Classifier gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
