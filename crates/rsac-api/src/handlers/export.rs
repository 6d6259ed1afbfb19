use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::dto::{ExportBody, ExportQuery};
use crate::error::ApiError;
use crate::services::{ExportOutcome, ExportService};
use crate::state::AppState;

/// GET export: no chart payloads, document contains data only.
pub async fn export_get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    run_export(state, query, ExportBody::default()).await
}

/// POST export: the body may carry base64 chart snapshots for embedding.
pub async fn export_post(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
    Json(body): Json<ExportBody>,
) -> Result<Response, ApiError> {
    run_export(state, query, body).await
}

async fn run_export(
    state: Arc<AppState>,
    query: ExportQuery,
    body: ExportBody,
) -> Result<Response, ApiError> {
    let service = ExportService::new(state.reports.clone());
    match service.export(&query, &body.charts).await? {
        ExportOutcome::NoData => Ok((
            StatusCode::OK,
            "No data found for the selected filter.",
        )
            .into_response()),
        ExportOutcome::File(file) => Ok(attachment(
            file.filename,
            file.content_type,
            file.bytes,
        )),
    }
}

pub(crate) fn attachment(filename: &str, content_type: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        bytes,
    )
        .into_response()
}
