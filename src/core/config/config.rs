use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use super::upstream::{Batch, Listing, Upstream};
use crate::core::is_default;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Setters)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    #[serde(skip_serializing_if = "is_default")]
    pub upstream: Upstream,
    #[serde(skip_serializing_if = "is_default")]
    pub batch: Batch,
    #[serde(skip_serializing_if = "is_default")]
    pub listing: Listing,
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_json(&self, pretty: bool) -> anyhow::Result<String> {
        if pretty {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(serde_json::to_string(self)?)
        }
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
