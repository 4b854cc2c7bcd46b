use crate::api::AppError;
use crate::export::model::{ExportFormat, ExportRequest};
use crate::export::service::export_report;
use axum::extract::Query;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jiff::Timestamp;
use serde::Deserialize;

pub async fn export_test_cases(
    Query(params): Query<ExportQueryParams>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let format = match params.format.as_deref() {
        None => ExportFormat::Excel,
        Some(name) => name.parse::<ExportFormat>().map_err(AppError::Validation)?,
    };
    let file = export_report(&request, format, Timestamp::now())?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, file.content_type.to_string()), (CONTENT_DISPOSITION, disposition)],
        file.body,
    )
        .into_response())
}

#[derive(Deserialize, Clone, Default)]
pub struct ExportQueryParams {
    pub format: Option<String>,
}
