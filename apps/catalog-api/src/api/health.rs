//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health_detailed;
use serde_json::Value;

use crate::state::AppState;

/// Create the readiness router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Readiness check - pings MongoDB
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let client = state.mongo_client.clone();
    let database: HealthCheckFuture = Box::pin(async move {
        let status = check_health_detailed(&client).await;
        if status.healthy {
            Ok(())
        } else {
            Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
        }
    });

    run_health_checks(vec![("database", database)])
        .await
        .unwrap_or_else(|not_ready| not_ready)
}
