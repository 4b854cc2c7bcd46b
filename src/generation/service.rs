use crate::api::AppError;
use crate::config::GenerationConfig;
use crate::generation::model::{GenerationRequest, GenerationResult, ImageAttachment, InputMode};
use crate::generation::prompt::build_prompt;
use crate::report::parser::{count_case_markers, parse_test_cases};
use async_trait::async_trait;
use jiff::Timestamp;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Failures a `ReportGenerator` reports back. Only implementations build
/// these; the service forwards the message.
#[allow(dead_code)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid credentials: {0}")]
    Unauthorized(String),
    #[error("quota exhausted: {0}")]
    QuotaExceeded(String),
    #[error("unreadable attachment '{0}'")]
    Attachment(String),
    #[error("{0}")]
    Upstream(String),
}

/// The external text generator. Receives the finished prompt plus the images
/// selected for the request and answers with the free-text report.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(
        &self,
        config: &GenerationConfig,
        prompt: &str,
        images: &[ImageAttachment],
    ) -> Result<String, GenerationError>;
}

/// Admits a single generation at a time. A second caller is turned away
/// rather than queued.
#[derive(Default)]
pub struct InFlightGuard {
    busy: AtomicBool,
}

pub struct InFlightPermit {
    guard: Arc<InFlightGuard>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(self: &Arc<Self>) -> Option<InFlightPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightPermit {
                guard: Arc::clone(self),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

pub fn validate_request(request: &GenerationRequest, config: &GenerationConfig) -> Result<(), AppError> {
    if resolve_api_key(request, config).is_none() {
        return Err(AppError::Validation("API key required".to_string()));
    }
    let has_images = !request.images.is_empty();
    let has_document = request.document.is_some();
    match request.input_mode {
        InputMode::Image if !has_images => Err(AppError::Validation(
            "Please upload at least one image (screenshot) for Image Only mode.".to_string(),
        )),
        InputMode::Document if !has_document => Err(AppError::Validation(
            "Please upload a document for Document Only mode.".to_string(),
        )),
        InputMode::Combined if !has_images && !has_document => Err(AppError::Validation(
            "Please upload at least an image or document for Combined mode.".to_string(),
        )),
        _ => Ok(()),
    }
}

fn resolve_api_key(request: &GenerationRequest, config: &GenerationConfig) -> Option<String> {
    request
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .or_else(|| Some(config.api_key.trim()).filter(|key| !key.is_empty()))
        .map(|key| key.to_string())
}

pub async fn generate_report(
    generator: &dyn ReportGenerator,
    guard: &Arc<InFlightGuard>,
    config: &GenerationConfig,
    request: GenerationRequest,
) -> Result<GenerationResult, AppError> {
    validate_request(&request, config)?;
    let _permit = match guard.try_acquire() {
        Some(permit) => permit,
        None => {
            warn!("rejected generation, another one is in flight");
            return Err(AppError::Busy("A generation is already in progress".to_string()));
        }
    };

    let mut effective = config.clone();
    if let Some(api_key) = resolve_api_key(&request, config) {
        effective.api_key = api_key;
    }
    let prompt = build_prompt(&request);
    let images = request.active_images();
    info!(
        "generating test cases with {}, mode: {}, images: {}, prompt length: {}",
        effective.model,
        request.input_mode,
        images.len(),
        prompt.len()
    );

    let report = generator
        .generate(&effective, &prompt, images)
        .await
        .map_err(|err| AppError::Generation(err.to_string()))?;

    let test_cases = parse_test_cases(&report);
    info!(
        "generation finished, {} of {} marked test cases parsed",
        test_cases.len(),
        count_case_markers(&report)
    );
    Ok(GenerationResult {
        id: Uuid::new_v4().to_string(),
        test_case_count: test_cases.len(),
        image_count: images.len(),
        character_count: report.chars().count(),
        generated_at: Timestamp::now().strftime("%Y-%m-%dT%H:%M:%SZ").to_string(),
        report,
        test_cases,
    })
}
