use anyhow::Result;
use agrilens::{config, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parses a level or a full `EnvFilter` directive list such as
/// `agrilens=debug,tower_http=info`.
fn parse_log_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| {
        anyhow::anyhow!(
            "Invalid log level: '{}' ({}). Use a level (error, warn, info, debug, trace) or target=level directives",
            filter,
            e
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration comes first so the log level can be read from it
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    let filter = match parse_log_filter(&log_level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!(
        port = config.server.port,
        mode = %config.server.analysis_mode,
        project = %config.vertex.project_id,
        location = %config.vertex.location,
        "Starting agrilens with log level: {}",
        log_level
    );

    server::run(config).await?;

    Ok(())
}
