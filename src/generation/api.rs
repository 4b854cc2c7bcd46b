use crate::api::{ApiResponse, AppError, AppState};
use crate::config::GenerationConfig;
use crate::generation::document::extract_document_text;
use crate::generation::model::{
    extension_of, DocumentAttachment, GenerationRequest, GenerationResult, ImageAttachment, InputMode,
    PromptPreview, DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS,
};
use crate::generation::prompt::build_prompt;
use crate::generation::service::generate_report;
use axum::extract::{Multipart, State};
use tracing::info;

pub async fn preview_prompt(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<ApiResponse<PromptPreview>, AppError> {
    let request = read_generation_form(multipart, &app_state.config.generation).await?;
    Ok(ApiResponse(PromptPreview {
        prompt: build_prompt(&request),
    }))
}

pub async fn create_generation(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<ApiResponse<GenerationResult>, AppError> {
    let generator = app_state
        .generator
        .clone()
        .ok_or_else(|| AppError::Unavailable("No report generator is configured".to_string()))?;
    let request = read_generation_form(multipart, &app_state.config.generation).await?;
    let result = generate_report(
        generator.as_ref(),
        &app_state.in_flight,
        &app_state.config.generation,
        request,
    )
    .await?;
    Ok(ApiResponse(result))
}

/// Collects the upload form. Unknown fields are ignored; `image` may repeat.
pub async fn read_generation_form(
    mut multipart: Multipart,
    config: &GenerationConfig,
) -> Result<GenerationRequest, AppError> {
    let mut test_type: Option<String> = None;
    let mut app_context = String::new();
    let mut input_mode = InputMode::default();
    let mut api_key: Option<String> = None;
    let mut images: Vec<ImageAttachment> = vec![];
    let mut document: Option<DocumentAttachment> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "test_type" => {
                test_type = Some(field.text().await?.trim().to_string()).filter(|t| !t.is_empty());
            }
            "app_context" => {
                app_context = field.text().await?.trim().to_string();
            }
            "input_mode" => {
                input_mode = field.text().await?.parse().map_err(AppError::Validation)?;
            }
            "api_key" => {
                api_key = Some(field.text().await?.trim().to_string()).filter(|k| !k.is_empty());
            }
            "image" | "images" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                if !IMAGE_EXTENSIONS.contains(&extension_of(&file_name).as_str()) {
                    return Err(AppError::Validation(format!(
                        "'{}' is not a supported image ({})",
                        file_name,
                        IMAGE_EXTENSIONS.join(", ")
                    )));
                }
                let data = field.bytes().await?;
                images.push(ImageAttachment::new(file_name, data));
            }
            "document" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                if !DOCUMENT_EXTENSIONS.contains(&extension_of(&file_name).as_str()) {
                    return Err(AppError::Validation(format!(
                        "'{}' is not a supported document ({})",
                        file_name,
                        DOCUMENT_EXTENSIONS.join(", ")
                    )));
                }
                let data = field.bytes().await?;
                let document_name = file_name.clone();
                let content = tokio::task::spawn_blocking(move || extract_document_text(&document_name, &data))
                    .await
                    .map_err(|err| AppError::Processing(format!("Failed to read document: {}", err)))?
                    .map_err(|err| AppError::Processing(format!("Failed to read document: {}", err)))?;
                document = Some(DocumentAttachment { file_name, content });
            }
            _ => {}
        }
    }

    info!(
        "received generation form, mode: {}, images: {}, document: {}",
        input_mode,
        images.len(),
        document.as_ref().map(|d| d.file_name.as_str()).unwrap_or("none")
    );
    Ok(GenerationRequest {
        test_type: test_type.unwrap_or_else(|| config.default_test_type.clone()),
        app_context,
        input_mode,
        api_key,
        images,
        document,
    })
}
