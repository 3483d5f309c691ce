use std::path::Path;

use super::{Config, SourceType};
use crate::core::error::Result;

/// Reads the configuration from a JSON or YAML file. The format is picked
/// from the file extension.
#[derive(Clone, Copy, Default)]
pub struct ConfigReader;

impl ConfigReader {
    pub fn init() -> Self {
        Self
    }

    pub async fn read<P: AsRef<Path>>(&self, path: P) -> Result<Config> {
        let path = path.as_ref();
        let source = SourceType::detect(path)?;
        let content = tokio::fs::read_to_string(path).await?;
        tracing::info!("Reading config from {}", path.display());
        Ok(source.decode(&content)?)
    }

    /// Reads `path` when given, otherwise falls back to the default config.
    pub async fn read_or_default<P: AsRef<Path>>(&self, path: Option<P>) -> Result<Config> {
        match path {
            Some(path) => self.read(path).await,
            None => Ok(Config::default()),
        }
    }
}
