//! API health check command.

use serde_json::json;

use shopora_cli::ApiClient;
use shopora_cli::output::{Format, emit_as};

/// `shopora health`: liveness, then readiness of the catalog store.
pub async fn run(client: &ApiClient, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let health = client.health().await?;
    let ready = client.ready().await?;

    let report = json!({ "health": &health, "ready": &ready, "api": client.base().as_str() });
    emit_as(format, &report, || {
        format!(
            "API {}: {} (at {})\nCatalog: {}",
            client.base(),
            health.status,
            health.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            ready.status,
        )
    })?;
    Ok(())
}
