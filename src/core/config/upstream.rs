use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::core::is_default;

const DEFAULT_MAX_SIZE: usize = 100;
const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
const DEFAULT_USER_AGENT: &str = concat!("reddio/", env!("CARGO_PKG_VERSION"));

/// How lookups issued by resolvers are grouped into upstream calls.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Setters)]
#[serde(rename_all = "camelCase", default)]
pub struct Batch {
    /// Milliseconds a batch stays open after its first key. Zero closes the
    /// batch at the end of the current tick.
    pub delay: usize,
    #[serde(default, skip_serializing_if = "is_default")]
    pub max_size: Option<usize>,
}

impl Default for Batch {
    fn default() -> Self {
        Batch { max_size: Some(DEFAULT_MAX_SIZE), delay: 0 }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Setters)]
#[serde(rename_all = "camelCase", default)]
pub struct Upstream {
    pub base_url: String,
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    pub connect_timeout: u64,
}

impl Default for Upstream {
    fn default() -> Self {
        Upstream {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: 60,
            connect_timeout: 30,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Setters)]
#[serde(rename_all = "camelCase", default)]
pub struct Listing {
    /// Posts requested per page.
    pub page_size: usize,
    /// Subreddits returned by the top subreddits query.
    pub top_limit: usize,
}

impl Default for Listing {
    fn default() -> Self {
        Listing { page_size: 25, top_limit: 25 }
    }
}
