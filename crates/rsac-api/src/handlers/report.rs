use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use crate::dto::{DistrictsQuery, ReportQuery, ReportResponse};
use crate::error::ApiError;
use crate::services::ReportService;
use crate::state::AppState;

pub async fn districts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DistrictsQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let service = ReportService::new(state.reports.clone());
    let names = service.districts(query.table.as_deref()).await?;
    Ok(Json(names))
}

pub async fn report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, ApiError> {
    let service = ReportService::new(state.reports.clone());
    let response = service.report(&query).await?;
    Ok(Json(response))
}
