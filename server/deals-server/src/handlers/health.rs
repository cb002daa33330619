use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::DealsServer;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall system health status
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
    /// Server version
    pub version: String,
    /// Individual service health checks
    pub checks: HashMap<String, String>,
}

/// Health check handler
pub async fn health_check(
    State(server): State<DealsServer>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    let mut checks = HashMap::new();

    let database_healthy = deals_storage::pool_is_healthy(&server.db_pool).await;
    checks.insert(
        "database".to_string(),
        if database_healthy { "healthy" } else { "unavailable" }.to_string(),
    );

    let response = HealthResponse {
        status: if database_healthy { "healthy" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    Ok(Json(api_success(response)))
}
