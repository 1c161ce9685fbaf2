//! Root and health endpoints.

use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

/// API banner returned at the root path
#[derive(Debug, Serialize)]
pub struct ApiBanner {
    pub message: &'static str,
    pub version: &'static str,
}

/// Simple health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

async fn root() -> Json<ApiBanner> {
    Json(ApiBanner {
        message: "Vitrin Backend API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Simple health check (for load balancers)
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Create root and health routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_serialization() {
        let banner = ApiBanner {
            message: "Vitrin Backend API",
            version: "0.1.0",
        };
        let json = serde_json::to_string(&banner).unwrap();
        assert!(json.contains("Vitrin Backend API"));
        assert!(json.contains("0.1.0"));
    }
}
