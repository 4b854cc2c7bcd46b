use crate::config::AppConfig;
use crate::export::api::export_test_cases;
use crate::export::service::ExportError;
use crate::generation::api::{create_generation, preview_prompt};
use crate::generation::service::{InFlightGuard, ReportGenerator};
use crate::report::api::parse_report;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub generator: Option<Arc<dyn ReportGenerator>>,
    pub in_flight: Arc<InFlightGuard>,
}

impl AppState {
    pub fn new(config: AppConfig, generator: Option<Arc<dyn ReportGenerator>>) -> Self {
        AppState {
            config: Arc::new(config),
            generator,
            in_flight: Arc::new(InFlightGuard::new()),
        }
    }
}

pub fn build_api(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = app_state.config.body_limit;

    Router::new()
        .route("/health", get(health))
        .route("/reports/parse", post(parse_report))
        .route("/reports/export", post(export_test_cases))
        .route("/prompts", post(preview_prompt))
        .route("/generations", post(create_generation))
        .fallback(not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new().include_headers(true))
            .on_request(
                DefaultOnRequest::new()
                    .level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Micros)
            ))
        .with_state(app_state)
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub generator_configured: bool,
    pub generation_in_flight: bool,
}

pub async fn health(State(app_state): State<AppState>) -> ApiResponse<HealthStatus> {
    ApiResponse(HealthStatus {
        status: "ok".to_string(),
        generator_configured: app_state.generator.is_some(),
        generation_in_flight: app_state.in_flight.is_busy(),
    })
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

pub struct ApiResponse<T>(pub T);

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match serde_json::to_string(&self.0) {
            Ok(json) => (StatusCode::OK, [(CONTENT_TYPE, "application/json")], json).into_response(),
            Err(err) => AppError::Internal(format!("Failed to serialize response: {}", err)).into_response(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Busy(String),
    #[error("{0}")]
    Processing(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Generation(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => { StatusCode::NOT_FOUND }
            AppError::Validation(_) => { StatusCode::BAD_REQUEST }
            AppError::Busy(_) => { StatusCode::CONFLICT }
            AppError::Processing(_) => { StatusCode::UNPROCESSABLE_ENTITY }
            AppError::Unavailable(_) => { StatusCode::SERVICE_UNAVAILABLE }
            AppError::Generation(_) => { StatusCode::BAD_GATEWAY }
            AppError::Internal(_) => { StatusCode::INTERNAL_SERVER_ERROR }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Internal(message) => {
                tracing::error!("{}", message);
                "Internal server error".to_string()
            }
            AppError::Generation(message) => {
                tracing::warn!("generation failed: {}", message);
                message
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Empty => AppError::Validation("Nothing to export".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::service::tests::RecordingGenerator;
    use axum::body::to_bytes;

    async fn error_body(response: Response) -> ErrorBody {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn error_statuses() {
        let cases = vec![
            (AppError::NotFound("x".to_string()), 404),
            (AppError::Validation("x".to_string()), 400),
            (AppError::Busy("x".to_string()), 409),
            (AppError::Processing("x".to_string()), 422),
            (AppError::Unavailable("x".to_string()), 503),
            (AppError::Generation("x".to_string()), 502),
            (AppError::Internal("x".to_string()), 500),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status().as_u16(), status);
        }
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let body = error_body(AppError::Internal("disk on fire".to_string()).into_response()).await;
        assert_eq!(body.message, "Internal server error");

        let body = error_body(AppError::Validation("API key required".to_string()).into_response()).await;
        assert_eq!(body.message, "API key required");
    }

    #[test]
    fn empty_export_maps_to_validation() {
        assert!(matches!(AppError::from(ExportError::Empty), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn health_reports_generator() {
        let state = AppState::new(AppConfig::default(), None);
        let ApiResponse(status) = health(State(state)).await;
        assert_eq!(status.status, "ok");
        assert!(!status.generator_configured);

        let generator: Arc<dyn ReportGenerator> = Arc::new(RecordingGenerator::default());
        let ApiResponse(status) = health(State(AppState::new(AppConfig::default(), Some(generator)))).await;
        assert!(status.generator_configured);
        assert!(!status.generation_in_flight);
    }

    #[test]
    fn router_builds() {
        let _router = build_api(AppState::new(AppConfig::default(), None));
    }
}
