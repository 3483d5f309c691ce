use std::path::Path;

use super::Config;

/// Serialization formats a config file can be written in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceType {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unsupported config extension: {0}")]
pub struct UnsupportedConfigFormat(pub String);

impl SourceType {
    /// Picks the format from the extension of `path`, ignoring case.
    pub fn detect(path: &Path) -> Result<SourceType, UnsupportedConfigFormat> {
        let unsupported = || UnsupportedConfigFormat(path.display().to_string());
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(unsupported)?;

        match ext.to_ascii_lowercase().as_str() {
            "json" => Ok(SourceType::Json),
            "yml" | "yaml" => Ok(SourceType::Yaml),
            _ => Err(unsupported()),
        }
    }

    pub fn decode(self, data: &str) -> anyhow::Result<Config> {
        match self {
            SourceType::Json => Config::from_json(data),
            SourceType::Yaml => Config::from_yaml(data),
        }
    }

    pub fn encode(self, config: &Config) -> anyhow::Result<String> {
        match self {
            SourceType::Json => config.to_json(true),
            SourceType::Yaml => config.to_yaml(),
        }
    }
}
