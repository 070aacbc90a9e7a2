// src/routes/health.rs
//! API health check endpoint for the compressor telemetry backend.
//!
//! This module defines the `/health` route used by container orchestrators
//! (e.g., Docker, Kubernetes) and CI pipelines to verify that the service
//! is running and can reach its document store. It is a sibling module in
//! the `routes` directory and follows the Explicit Module Boundary Pattern
//! (EMBP):
//! - Internal to this file: endpoint handler(s) and related types
//! - Exports to the gateway (`mod.rs`): a subrouter containing the
//!   `/health` route

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::AppState;
use crate::error::ApiResult;
use crate::store;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

/// Handle `GET /health`.
///
/// Probes the store with the cheapest possible query; a store fault
/// surfaces as the adapter's 5xx rather than a fake "ok".
async fn health(State((pool, _)): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    // ---
    store::ping(&pool).await?;

    Ok(Json(HealthResponse {
        status: "ok",
        database: "ok",
    }))
}

/// Create a subrouter containing the `/health` route.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
