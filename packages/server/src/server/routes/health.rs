use std::time::{Duration, Instant};

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    otp_store: StoreHealth,
}

#[derive(Serialize)]
pub struct StoreHealth {
    status: &'static str,
    latency_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StoreHealth {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Health check endpoint
///
/// Pings the OTP store; 200 when it answers within five seconds, 503 otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let error = match tokio::time::timeout(PING_TIMEOUT, state.deps.otp_store.ping()).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("Ping failed: {}", e)),
        Err(_) => Some(format!("Ping timeout (>{}s)", PING_TIMEOUT.as_secs())),
    };

    let otp_store = StoreHealth {
        status: if error.is_none() { "ok" } else { "error" },
        latency_ms: started.elapsed().as_millis(),
        error,
    };

    let (status_code, status) = if otp_store.is_ok() {
        (StatusCode::OK, "healthy")
    } else {
        tracing::warn!(error = ?otp_store.error, "OTP store unhealthy");
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (status_code, Json(HealthResponse { status, otp_store }))
}
