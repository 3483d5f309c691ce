use std::sync::Arc;

use crate::core::config::Batch;
use crate::core::data_loader::DataLoader;
use crate::core::reddit::{RedditClient, SubredditInfoLoader};

pub struct DataLoaders {
    pub subreddit_info: DataLoader<String, SubredditInfoLoader>,
}

/// Per-response state shared by all resolvers. Owns the data loaders, so
/// their caches live exactly as long as one response construction.
pub struct ResolverContext {
    pub data_loaders: DataLoaders,
}

impl ResolverContext {
    pub fn new(client: Arc<RedditClient>, batch: &Batch) -> Self {
        Self {
            data_loaders: DataLoaders {
                subreddit_info: SubredditInfoLoader::new(client).into_data_loader(batch),
            },
        }
    }
}
