use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::client::{normalize_path, subreddit_name, RedditClient};
use super::model::SubredditInfo;
use crate::core::config::Batch;
use crate::core::data_loader::{DataLoader, Loader};

const INFO_LIMIT: usize = 100;

/// Batch source for [SubredditInfo], keyed by subreddit URL path.
#[derive(Clone)]
pub struct SubredditInfoLoader {
    client: Arc<RedditClient>,
}

impl SubredditInfoLoader {
    pub fn new(client: Arc<RedditClient>) -> Self {
        Self { client }
    }

    pub fn into_data_loader(self, batch: &Batch) -> DataLoader<String, SubredditInfoLoader> {
        DataLoader::new(self, tokio::spawn)
            .delay(Duration::from_millis(batch.delay as u64))
            .max_batch_size(batch.max_size.unwrap_or(INFO_LIMIT).min(INFO_LIMIT))
    }
}

#[async_trait::async_trait]
impl Loader<String> for SubredditInfoLoader {
    type Value = SubredditInfo;
    type Error = Arc<anyhow::Error>;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        let names: Vec<&str> = keys.iter().filter_map(|key| subreddit_name(key)).collect();
        if names.is_empty() {
            return Ok(HashMap::new());
        }

        let infos = self.client.subreddit_info(&names).await.map_err(Arc::new)?;
        tracing::debug!(requested = keys.len(), received = infos.len(), "subreddit info batch");

        let by_path: HashMap<String, SubredditInfo> = infos
            .into_iter()
            .map(|info| (normalize_path(&info.url), info))
            .collect();

        Ok(keys
            .iter()
            .filter_map(|key| {
                by_path
                    .get(&normalize_path(key))
                    .map(|info| (key.clone(), info.clone()))
            })
            .collect())
    }
}
