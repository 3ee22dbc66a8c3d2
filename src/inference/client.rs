use super::{auth::Credentials, types::*};
use crate::{Error, Result, config::VertexConfig};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A hosted multimodal model that turns a prompt plus one image into text.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}

pub struct VertexClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    credentials: Credentials,
}

impl VertexClient {
    pub fn new(config: &VertexConfig, credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint_url(config),
            model: config.model.clone(),
            credentials,
        }
    }

    /// Discovers credentials and builds the client. Called once at startup.
    pub async fn from_config(config: &VertexConfig) -> Result<Self> {
        let credentials = Credentials::discover(config).await?;
        Ok(Self::new(config, credentials))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

pub fn endpoint_url(config: &VertexConfig) -> String {
    let base = match &config.base_url {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => format!("https://{}-aiplatform.googleapis.com", config.location),
    };

    format!(
        "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
        base, config.project_id, config.location, config.model
    )
}

#[async_trait]
impl InferenceClient for VertexClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        debug!(
            model = %self.model,
            prompt_len = request.prompt.len(),
            image_bytes = request.image.data.len(),
            mime_type = ?request.image.mime_type,
            "Sending request to Vertex AI"
        );

        let token = self.credentials.access_token(&self.http).await?;
        let body = GenerateContentRequest::from_request(&request);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::inference(format!(
                "Vertex AI error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            Error::inference(format!("Failed to parse Vertex AI response: {}", e))
        })?;

        let generated = api_response.into_generate_response()?;

        debug!(
            finish_reason = ?generated.finish_reason,
            text_len = generated.text.len(),
            "Received Vertex AI response"
        );

        Ok(generated)
    }
}

// ============================================================================
// Vertex AI request/response wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentRequest {
    fn from_request(request: &GenerateRequest) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    RequestPart::Text {
                        text: request.prompt.clone(),
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: request.image.mime_type.clone(),
                            data: STANDARD.encode(&request.image.data),
                        },
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate.
    fn into_generate_response(self) -> Result<GenerateResponse> {
        let usage = self.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            candidates_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(Error::inference(format!("Prompt was blocked: {}", reason)));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::inference(format!(
                "Model returned no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(GenerateResponse {
            text,
            finish_reason: candidate.finish_reason,
            usage,
        })
    }
}
