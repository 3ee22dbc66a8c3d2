pub mod form;
pub mod handlers;
pub mod types;

use crate::{Result, config::Config, inference::VertexClient};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Builds the application router around already-initialized state.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/get-prompts", get(handlers::get_prompts))
        .route("/analyze", post(handlers::analyze))
        .route("/batch-analyze", post(handlers::batch_analyze))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Initialize the inference client once; handlers share it
    let client = VertexClient::from_config(&config.vertex).await?;
    info!(
        endpoint = %client.endpoint(),
        credentials = client.credentials().kind(),
        "Vertex AI client ready"
    );

    let app_state = AppState::new(Arc::new(client), config.server.analysis_mode);
    let app = router(app_state, config.server.max_body_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
