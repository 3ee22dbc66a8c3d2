mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

/// Loads the YAML file named by `CONFIG_PATH` (default `config.yaml`) when it
/// exists, then applies environment overrides.
pub async fn load() -> Result<Config> {
    load_with(|key| env::var(key).ok()).await
}

/// [`load`] with variables read through `lookup` instead of the process
/// environment.
pub async fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = lookup("CONFIG_PATH").unwrap_or_else(|| "config.yaml".to_string());

    let mut config = load_file(&config_path).await?;
    config.apply_overrides(lookup)?;

    Ok(config)
}

/// Parses `path`, or returns the defaults when no such file exists.
pub async fn load_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        debug!("No configuration file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

impl Config {
    /// Overlays values found through `lookup` (normally the process
    /// environment) on top of the file configuration.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(mode) = lookup("ANALYSIS_MODE") {
            self.server.analysis_mode = mode.parse()?;
        }
        if let Some(path) = lookup("GOOGLE_APPLICATION_CREDENTIALS") {
            self.vertex.credentials_path = path;
        }
        if let Some(project_id) = lookup("VERTEX_PROJECT_ID") {
            self.vertex.project_id = project_id;
        }
        if let Some(location) = lookup("VERTEX_LOCATION") {
            self.vertex.location = location;
        }
        if let Some(model) = lookup("VERTEX_MODEL") {
            self.vertex.model = model;
        }
        if let Some(base_url) = lookup("VERTEX_BASE_URL") {
            self.vertex.base_url = Some(base_url).filter(|url| !url.is_empty());
        }

        Ok(())
    }
}
