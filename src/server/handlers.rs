use super::{
    form,
    types::{BatchResponse, ErrorResponse},
};
use crate::{
    Error, analysis,
    analysis::AnalysisResult,
    config::AnalysisMode,
    inference::InferenceClient,
    prompts::PromptCatalog,
};
use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{Html, Json},
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("../../static/index.html");

type HandlerError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub inference: Arc<dyn InferenceClient>,
    pub prompts: Arc<PromptCatalog>,
    pub mode: AnalysisMode,
}

impl AppState {
    pub fn new(inference: Arc<dyn InferenceClient>, mode: AnalysisMode) -> Self {
        Self {
            inference,
            prompts: Arc::new(PromptCatalog::builtin()),
            mode,
        }
    }
}

fn failure(request_id: Uuid, e: Error) -> HandlerError {
    error!("Request {} failed: {}", request_id, e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn get_prompts(State(state): State<AppState>) -> Json<PromptCatalog> {
    Json(state.prompts.as_ref().clone())
}

pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, HandlerError> {
    let request_id = Uuid::new_v4();

    let multipart = multipart.map_err(|e| failure(request_id, e.into()))?;
    let request = form::read_analysis_form(multipart)
        .await
        .map_err(|e| failure(request_id, e))?;

    info!(
        %request_id,
        category = %request.category,
        image = ?request.image.file_name,
        mode = %state.mode,
        "Received analysis request"
    );

    let result = analysis::analyze(state.inference.as_ref(), request, state.mode)
        .await
        .map_err(|e| failure(request_id, e))?;

    info!(%request_id, "Analysis completed");
    Ok(Json(result))
}

pub async fn batch_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BatchResponse>, HandlerError> {
    let request_id = Uuid::new_v4();

    let multipart = multipart.map_err(|e| failure(request_id, e.into()))?;
    let request = form::read_batch_form(multipart)
        .await
        .map_err(|e| failure(request_id, e))?;

    info!(
        %request_id,
        images = request.images().len(),
        "Received batch analysis request"
    );

    let results = analysis::analyze_batch(state.inference.as_ref(), request)
        .await
        .map_err(|e| failure(request_id, e))?;

    info!(%request_id, analyzed = results.len(), "Batch analysis completed");
    Ok(Json(BatchResponse { results }))
}
