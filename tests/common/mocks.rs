use agrilens::{
    Error, Result,
    inference::{GenerateRequest, GenerateResponse, InferenceClient},
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Mock inference client for testing
#[derive(Debug, Default)]
pub struct MockInferenceClient {
    pub requests: Arc<Mutex<Vec<GenerateRequest>>>,
    pub error: Option<String>,
    pub fail_on_call: Option<usize>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `error`.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Only the call with this zero-based index fails.
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn get_requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let file_name = request.image.file_name_or_default();

        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len() - 1
        };

        if let Some(ref error) = self.error {
            return Err(Error::inference(error.clone()));
        }

        if self.fail_on_call == Some(call) {
            return Err(Error::inference(format!("Mock failure on call {}", call)));
        }

        Ok(create_mock_response(&format!("Analysis of {}", file_name)))
    }
}

pub fn create_mock_response(text: &str) -> GenerateResponse {
    GenerateResponse {
        text: text.to_string(),
        finish_reason: Some("STOP".to_string()),
        usage: None,
    }
}
