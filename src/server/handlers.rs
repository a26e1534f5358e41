use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::SharedState;
use crate::error::{ApiError, ApiResult};
use crate::interpreter::{ExplanationSolution, MindMapNode};
use crate::services::{StudyInput, Upload};

/// Form field carrying the uploaded file
pub const FILE_FIELD: &str = "file";
/// Form field carrying the question on `/gemini`
pub const MESSAGE_FIELD: &str = "message";
/// Form field carrying the concept on `/mindmap`
pub const CONCEPT_FIELD: &str = "concept";

/// JSON body of `/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Question for the Virtual Professor
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `/`
#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    /// Liveness banner
    pub message: &'static str,
}

/// Body of `/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Configured Gemini model
    pub model: String,
    /// Time the check was answered
    pub timestamp: DateTime<Utc>,
}

/// `GET /`
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "EduMind backend is running!",
    })
}

/// `GET /health`
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model: state.config.gemini.model.clone(),
        timestamp: Utc::now(),
    })
}

/// `POST /chat` with `{"message": "..."}`
pub async fn chat(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ExplanationSolution>> {
    let request_id = Uuid::new_v4();

    let result = async {
        let Json(request) =
            payload.map_err(|e| json_rejection(e, state.config.server.max_upload_bytes))?;
        let input = StudyInput::from_parts(request.message, None)?;
        info!(%request_id, endpoint = "/chat", input = input.describe(), "Processing request");
        state.explain.process(input).await
    }
    .await;

    finish(request_id, "/chat", result).map(Json)
}

/// `POST /gemini` with multipart `message` and/or `file`
pub async fn explain_upload(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ExplanationSolution>> {
    let request_id = Uuid::new_v4();

    let result = async {
        let multipart = multipart.map_err(multipart_rejection)?;
        let form = read_form(multipart, MESSAGE_FIELD, state.config.server.max_upload_bytes).await?;
        let input = StudyInput::from_parts(form.text, form.upload)?;
        info!(%request_id, endpoint = "/gemini", input = input.describe(), "Processing request");
        state.explain.process(input).await
    }
    .await;

    finish(request_id, "/gemini", result).map(Json)
}

/// `POST /mindmap` with multipart `concept` and/or `file`.
///
/// Always answers with a tree when the upstream call succeeds; unreadable
/// replies become the fallback tree.
pub async fn mind_map(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<MindMapNode>> {
    let request_id = Uuid::new_v4();

    let result = async {
        let multipart = multipart.map_err(multipart_rejection)?;
        let form = read_form(multipart, CONCEPT_FIELD, state.config.server.max_upload_bytes).await?;
        let input = StudyInput::from_parts(form.text, form.upload)?;
        info!(%request_id, endpoint = "/mindmap", input = input.describe(), "Processing request");
        state.mind_map.process(input).await
    }
    .await;

    finish(request_id, "/mindmap", result).map(|outcome| Json(outcome.into_tree()))
}

/// Text and file fields read from a multipart form
#[derive(Debug, Default)]
pub struct FormInput {
    /// Value of the text field, if sent
    pub text: Option<String>,
    /// Non-empty file part, if sent
    pub upload: Option<Upload>,
}

/// Read the text field named `text_field` and the [`FILE_FIELD`] upload
async fn read_form(
    mut multipart: Multipart,
    text_field: &str,
    max_upload_bytes: usize,
) -> ApiResult<FormInput> {
    let mut form = FormInput::default();
    let field_error = |e: MultipartError| multipart_error(e, max_upload_bytes);

    while let Some(field) = multipart.next_field().await.map_err(field_error)? {
        let name = field.name().unwrap_or("").to_string();

        if name == text_field {
            form.text = Some(field.text().await.map_err(field_error)?);
        } else if name == FILE_FIELD {
            let file_name = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().unwrap_or("").to_string();
            let data = field.bytes().await.map_err(field_error)?;

            // Browsers send an empty part for an untouched file input
            if data.is_empty() {
                debug!(file = %file_name, "Ignoring empty file part");
                continue;
            }

            if data.len() > max_upload_bytes {
                return Err(ApiError::PayloadTooLarge {
                    max: max_upload_bytes,
                });
            }

            debug!(file = %file_name, content_type = %content_type, bytes = data.len(), "Received upload");
            form.upload = Some(Upload::new(file_name, content_type, data.to_vec()));
        } else {
            debug!(field = %name, "Ignoring unknown form field");
        }
    }

    Ok(form)
}

fn multipart_error(e: MultipartError, max_upload_bytes: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge {
            max: max_upload_bytes,
        }
    } else {
        ApiError::BadRequest {
            message: e.body_text(),
        }
    }
}

fn multipart_rejection(rejection: MultipartRejection) -> ApiError {
    ApiError::BadRequest {
        message: rejection.body_text(),
    }
}

fn json_rejection(rejection: JsonRejection, max_upload_bytes: usize) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge {
            max: max_upload_bytes,
        }
    } else {
        ApiError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Log the outcome of a request
fn finish<T>(request_id: Uuid, endpoint: &str, result: ApiResult<T>) -> ApiResult<T> {
    match &result {
        Ok(_) => info!(%request_id, endpoint, "Request completed"),
        Err(e) if e.status().is_server_error() => {
            error!(%request_id, endpoint, error = %e, "Error processing request")
        }
        Err(e) => warn!(%request_id, endpoint, error = %e, "Rejected request"),
    }
    result
}
