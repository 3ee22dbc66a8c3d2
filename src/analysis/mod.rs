mod types;

pub use types::*;

use crate::{
    Result,
    config::AnalysisMode,
    inference::{GenerateRequest, InferenceClient},
    prompts::enhance_prompt,
};
use chrono::{SecondsFormat, Utc};
use tracing::debug;

/// Runs one image through the model.
///
/// In [`AnalysisMode::Enriched`] the prompt gains the report-format block
/// and the result is stamped with the time, category and file name.
pub async fn analyze(
    client: &dyn InferenceClient,
    request: AnalysisRequest,
    mode: AnalysisMode,
) -> Result<AnalysisResult> {
    let prompt = match mode {
        AnalysisMode::Enriched => enhance_prompt(&request.prompt),
        AnalysisMode::Minimal => request.prompt,
    };
    let image_name = request.image.file_name_or_default();

    let response = client
        .generate(GenerateRequest {
            prompt,
            image: request.image,
        })
        .await?;

    if let Some(usage) = &response.usage {
        debug!(
            prompt_tokens = usage.prompt_tokens,
            candidates_tokens = usage.candidates_tokens,
            "Analysis token usage"
        );
    }

    Ok(match mode {
        AnalysisMode::Enriched => AnalysisResult {
            analysis: response.text,
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
            category: Some(request.category),
            image_name: Some(image_name),
        },
        AnalysisMode::Minimal => AnalysisResult {
            analysis: response.text,
            timestamp: None,
            category: None,
            image_name: None,
        },
    })
}

/// Analyzes each image in order with the shared prompt. The first failure
/// aborts the batch and nothing collected so far is returned.
pub async fn analyze_batch(
    client: &dyn InferenceClient,
    request: BatchAnalysisRequest,
) -> Result<Vec<BatchItem>> {
    let mut results = Vec::with_capacity(request.images().len());

    for (index, image) in request.images().iter().enumerate() {
        debug!(index, file_name = ?image.file_name, "Analyzing batch image");

        let response = client
            .generate(GenerateRequest {
                prompt: request.prompt.clone(),
                image: image.clone(),
            })
            .await?;

        results.push(BatchItem {
            filename: image.file_name_or_default(),
            analysis: response.text,
        });
    }

    Ok(results)
}
