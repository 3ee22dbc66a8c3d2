use crate::inference::ImageInput;
use serde::Serialize;

pub const DEFAULT_CATEGORY: &str = "general";
pub const MAX_BATCH_IMAGES: usize = 5;

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub prompt: String,
    pub image: ImageInput,
    pub category: String,
}

impl AnalysisRequest {
    /// A missing category falls back to `general`; a submitted one is kept
    /// as sent, even when blank.
    pub fn new(prompt: String, image: ImageInput, category: Option<String>) -> Self {
        let category = category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Self {
            prompt,
            image,
            category,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchAnalysisRequest {
    pub prompt: String,
    images: Vec<ImageInput>,
}

impl BatchAnalysisRequest {
    /// Keeps at most [`MAX_BATCH_IMAGES`] images, in submission order.
    pub fn new(prompt: String, mut images: Vec<ImageInput>) -> Self {
        images.truncate(MAX_BATCH_IMAGES);
        Self { prompt, images }
    }

    pub fn images(&self) -> &[ImageInput] {
        &self.images
    }
}

/// Body of a successful `POST /analyze`. Metadata fields are only present in
/// enriched mode.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub filename: String,
    pub analysis: String,
}
