//! Search service configuration.
//!
//! `SearchConfig` represents the top-level `config.toml` controlling where
//! index artifacts live and the default result count. All fields have
//! sensible defaults so a missing or partial file is never fatal.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Lodestone search service.
///
/// Loaded from `{data_dir}/config.toml`; see `lodestone-infra::config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Directory holding the persisted index artifacts.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base name of the index artifacts (`<base>.index`, `<base>.meta.json`).
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Default number of results when the caller does not specify `k`.
    #[serde(default = "default_k")]
    pub default_k: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_index_name() -> String {
    "catalog".to_string()
}

fn default_k() -> usize {
    8
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            index_name: default_index_name(),
            default_k: default_k(),
        }
    }
}

impl SearchConfig {
    /// The shared base path both index artifacts are keyed by.
    pub fn index_base(&self) -> PathBuf {
        self.data_dir.join(&self.index_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SearchConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.index_name, "catalog");
        assert_eq!(config.default_k, 8);
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: SearchConfig = toml::from_str("").unwrap();
        assert_eq!(config.default_k, 8);
        assert_eq!(config.index_base(), PathBuf::from("data/catalog"));
    }

    #[test]
    fn test_deserialize_partial_override() {
        let config: SearchConfig = toml::from_str(
            r#"
data_dir = "/var/lib/lodestone"
default_k = 12
"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/lodestone"));
        assert_eq!(config.index_name, "catalog");
        assert_eq!(config.default_k, 12);
        assert_eq!(
            config.index_base(),
            PathBuf::from("/var/lib/lodestone/catalog")
        );
    }
}
