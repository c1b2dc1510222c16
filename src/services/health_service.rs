use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the storage backend and report whether writes currently succeed.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if let Err(err) = state.store().health_check().await {
        warn!(error = %err, "storage health check failed");
    }

    if state.is_degraded() {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
