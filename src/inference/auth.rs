//! Access tokens for Vertex AI.
//!
//! Three sources are tried at startup, in order: a bearer token from
//! `VERTEX_ACCESS_TOKEN`, a local service-account key file, and finally the
//! Cloud Run / GCE metadata server. Tokens are fetched per call.

use crate::{Error, Result, config::VertexConfig};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{env, fmt};
use tracing::{debug, info};

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a Google service-account key file this client needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Credentials {
    Static(String),
    ServiceAccount(ServiceAccountKey),
    Metadata { token_url: String },
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl Credentials {
    /// Picks the credential source for this process.
    pub async fn discover(config: &VertexConfig) -> Result<Self> {
        Self::discover_with(config, |key| env::var(key).ok()).await
    }

    /// Same as [`Credentials::discover`], reading variables through `lookup`.
    pub async fn discover_with<F>(config: &VertexConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("VERTEX_ACCESS_TOKEN").filter(|t| !t.trim().is_empty()) {
            info!("Using access token from VERTEX_ACCESS_TOKEN");
            return Ok(Self::Static(token));
        }

        if tokio::fs::try_exists(&config.credentials_path).await? {
            info!(
                "Using service account key from {}",
                config.credentials_path
            );
            let json = tokio::fs::read_to_string(&config.credentials_path).await?;
            return Self::from_key_json(&json);
        }

        info!("No local credentials found, using the metadata server");
        Ok(Self::metadata())
    }

    pub fn from_key_json(json: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| Error::auth(format!("Invalid service account key: {}", e)))?;
        Ok(Self::ServiceAccount(key))
    }

    pub fn metadata() -> Self {
        Self::Metadata {
            token_url: METADATA_TOKEN_URL.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Static(_) => "static",
            Self::ServiceAccount(_) => "service_account",
            Self::Metadata { .. } => "metadata",
        }
    }

    pub async fn access_token(&self, http: &Client) -> Result<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ServiceAccount(key) => exchange_assertion(http, key).await,
            Self::Metadata { token_url } => fetch_metadata_token(http, token_url).await,
        }
    }
}

/// Builds the RS256-signed JWT the token endpoint exchanges for an access
/// token.
pub fn sign_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String> {
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: CLOUD_PLATFORM_SCOPE,
        aud: &key.token_uri,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
}

async fn exchange_assertion(http: &Client, key: &ServiceAccountKey) -> Result<String> {
    let assertion = sign_assertion(key, chrono::Utc::now().timestamp())?;

    debug!("Exchanging service account assertion at {}", key.token_uri);

    let response = http
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    read_token(response).await
}

async fn fetch_metadata_token(http: &Client, token_url: &str) -> Result<String> {
    let response = http
        .get(token_url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| {
            Error::auth(format!(
                "Metadata server unreachable ({}); set VERTEX_ACCESS_TOKEN or provide a key file",
                e
            ))
        })?;

    read_token(response).await
}

async fn read_token(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::auth(format!(
            "Token request failed with {}: {}",
            status, body
        )));
    }

    let token: TokenResponse = response.json().await?;
    Ok(token.access_token)
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}
