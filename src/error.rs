use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing form field: {0}")]
    MissingField(String),

    #[error("Form error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Invalid form: {0}")]
    InvalidForm(#[from] axum::extract::multipart::MultipartRejection),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Token signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::MissingField(name.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }
}
