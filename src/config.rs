use std::path::Path;

use mestre_util::result_ext::ResultExt as _;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read config file: {0}")]
    Read(String),

    #[error("unable to parse config file: {0}")]
    Parse(String),
}

/// Literals the lenient encoder falls back to while the form is still being filled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub fallback_name: String,
    pub fallback_city: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self { fallback_name: "Recebedor".to_string(), fallback_city: "SAO PAULO".to_string() }
    }
}

impl EncoderConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err_str(ConfigError::Parse)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err_path(path, ConfigError::Read)?;

        let config = Self::from_json(&json)?;
        tracing::debug!("loaded encoder config from {}", path.display());

        Ok(config)
    }
}
