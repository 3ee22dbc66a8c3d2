//! Reads the multipart bodies of the analysis endpoints.

use crate::{
    Error, Result,
    analysis::{AnalysisRequest, BatchAnalysisRequest, MAX_BATCH_IMAGES},
    inference::ImageInput,
};
use axum::extract::{Multipart, multipart::Field};
use tracing::debug;

async fn read_image(field: Field<'_>) -> Result<ImageInput> {
    let file_name = field.file_name().map(str::to_string);
    let mime_type = field.content_type().map(str::to_string);
    let data = field.bytes().await?;

    Ok(ImageInput {
        data,
        mime_type,
        file_name,
    })
}

/// Fields: `image` (file), `prompt` (text), optional `category` (text).
pub async fn read_analysis_form(mut multipart: Multipart) -> Result<AnalysisRequest> {
    let mut image = None;
    let mut prompt = None;
    let mut category = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => image = Some(read_image(field).await?),
            Some("prompt") => prompt = Some(field.text().await?),
            Some("category") => category = Some(field.text().await?),
            other => debug!(field = ?other, "Ignoring unexpected form field"),
        }
    }

    let image = image.ok_or_else(|| Error::missing_field("image"))?;
    let prompt = prompt.ok_or_else(|| Error::missing_field("prompt"))?;

    Ok(AnalysisRequest::new(prompt, image, category))
}

/// Fields: repeated `images` (files) and `prompt` (text). Images past the
/// batch limit are drained without being buffered.
pub async fn read_batch_form(mut multipart: Multipart) -> Result<BatchAnalysisRequest> {
    let mut images = Vec::new();
    let mut skipped = 0usize;
    let mut prompt = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("images") if images.len() < MAX_BATCH_IMAGES => {
                images.push(read_image(field).await?)
            }
            Some("images") => skipped += 1,
            Some("prompt") => prompt = Some(field.text().await?),
            other => debug!(field = ?other, "Ignoring unexpected form field"),
        }
    }

    if skipped > 0 {
        debug!(skipped, "Ignoring images beyond the batch limit");
    }

    let prompt = prompt.ok_or_else(|| Error::missing_field("prompt"))?;

    Ok(BatchAnalysisRequest::new(prompt, images))
}
