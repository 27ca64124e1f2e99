//! HTTP health endpoint.
//!
//! Hosting platforms probe the bot over HTTP, so the router answers even when
//! no Discord connection is configured.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde_json::json;

/// Creates the health router.
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
