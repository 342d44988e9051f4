use patient_front::config::PatientFrontConfig;
use patient_front::services::{init_metrics, PatientClient};
use patient_front::startup::build_router;
use patient_front::AppState;
use service_core::observability::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = PatientFrontConfig::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "patient-front",
        &configuration.common.log_level,
        configuration.common.otlp_endpoint.as_deref(),
    )?;
    init_metrics();

    let patient_client = Arc::new(PatientClient::new(
        &configuration.gateway,
        &configuration.upstream,
    )?);
    info!(gateway = %patient_client.base_url(), "Patient service client ready");

    let app = build_router(AppState::new(patient_client));

    let address = format!("0.0.0.0:{}", configuration.common.port);
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting patient-front on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
