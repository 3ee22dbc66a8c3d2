use axum::body::Bytes;

/// An uploaded image as received from the browser.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub data: Bytes,
    /// Declared media type, forwarded uninterpreted.
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
}

impl ImageInput {
    pub fn new(data: impl Into<Bytes>, mime_type: Option<String>, file_name: Option<String>) -> Self {
        Self {
            data: data.into(),
            mime_type,
            file_name,
        }
    }

    pub fn file_name_or_default(&self) -> String {
        self.file_name.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub image: ImageInput,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub candidates_tokens: u32,
    pub total_tokens: u32,
}
