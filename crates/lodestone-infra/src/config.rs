//! Configuration loader for the Lodestone search service.
//!
//! Reads `config.toml` from the working directory and deserializes it into
//! [`SearchConfig`]. Falls back to defaults when the file is missing or
//! malformed -- a broken config should never keep the service from
//! starting.

use std::path::Path;

use lodestone_types::config::SearchConfig;

/// Load the search configuration from `{dir}/config.toml`.
///
/// - If the file does not exist, returns [`SearchConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - Otherwise returns the parsed config.
pub async fn load_config(dir: &Path) -> SearchConfig {
    let config_path = dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return SearchConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return SearchConfig::default();
        }
    };

    match toml::from_str::<SearchConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            SearchConfig::default()
        }
    }
}
