use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::handlers::{export, health, report, transport};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/districts", get(report::districts))
        .route("/report", get(report::report))
        .route("/export", get(export::export_get).post(export::export_post))
        .route("/transport/dashboard", get(transport::dashboard))
        .route("/transport/export", get(transport::dashboard_export))
        .with_state(state)
}
