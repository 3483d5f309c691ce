use std::sync::Arc;

use super::client::RedditClient;
use super::model::Post;
use crate::core::listing::{Page, PageFetcher};

/// Pages through the posts of one reddit path.
pub struct RedditListing {
    client: Arc<RedditClient>,
    pathname: String,
    page_size: usize,
}

impl RedditListing {
    pub fn new(client: Arc<RedditClient>, pathname: impl Into<String>, page_size: usize) -> Self {
        Self { client, pathname: pathname.into(), page_size }
    }
}

#[async_trait::async_trait]
impl PageFetcher<Post> for RedditListing {
    async fn fetch(&self, after: Option<String>) -> anyhow::Result<Page<Post>> {
        tracing::info!(pathname = %self.pathname, after = ?after, "fetching listing page");
        self.client
            .listing(&self.pathname, after.as_deref(), self.page_size)
            .await
    }
}
