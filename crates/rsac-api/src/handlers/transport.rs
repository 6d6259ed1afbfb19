use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::Json;

use rsac_core::models::DashboardSummary;
use rsac_export::pdf;

use crate::error::ApiError;
use crate::state::AppState;

use super::export::attachment;

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = state.dashboard.dashboard_summary().await?;
    Ok(Json(summary))
}

pub async fn dashboard_export(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let summary = state.dashboard.dashboard_summary().await?;
    let bytes = pdf::render_dashboard_pdf(&summary)?;
    Ok(attachment(
        rsac_export::DASHBOARD_PDF_FILENAME,
        rsac_export::PDF_CONTENT_TYPE,
        bytes,
    ))
}
