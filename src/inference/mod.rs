pub mod auth;
pub mod client;
pub mod types;

pub use auth::{Credentials, ServiceAccountKey};
pub use client::{InferenceClient, VertexClient};
pub use types::*;
