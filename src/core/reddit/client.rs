use anyhow::Result;
use serde::de::DeserializeOwned;
use url::Url;

use super::model::{ListingResponse, Post, Subreddit, SubredditInfo, SubredditSummary};
use crate::core::config::Upstream;
use crate::core::listing::{Page, PageInfo};
use crate::core::runtime::TargetRuntime;

/// Typed access to the reddit JSON API.
pub struct RedditClient {
    runtime: TargetRuntime,
    base_url: Url,
}

/// `/r/rust/` and `r/Rust` both become `/r/rust/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    format!("/{}/", trimmed.to_lowercase())
}

/// Name of the subreddit a URL path points to, `/r/rust/` gives `rust`.
pub fn subreddit_name(path: &str) -> Option<&str> {
    let mut segments = path.trim_matches('/').split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("r"), Some(name), None) if !name.is_empty() => Some(name),
        _ => None,
    }
}

fn listing_path(pathname: &str) -> String {
    format!("/{}.json", pathname.trim_matches('/'))
}

impl RedditClient {
    pub fn new(runtime: TargetRuntime, upstream: &Upstream) -> Result<Self> {
        let mut base_url = Url::parse(&upstream.base_url)?;
        // Paths are joined relative to the base, so a mount point like
        // `https://proxy.local/reddit` must end with a slash to survive.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { runtime, base_url })
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let request = reqwest::Request::new(reqwest::Method::GET, url);
        let response = self.runtime.http.execute(request).await?;
        response.to_json()
    }

    /// Most popular subreddits right now.
    pub async fn top_subreddits(&self, limit: usize) -> Result<Vec<Subreddit>> {
        let url = self.url("/subreddits/popular.json", &[("limit", limit.to_string())])?;
        let listing: ListingResponse<SubredditSummary> = self.get_json(url).await?;

        listing
            .data
            .children
            .into_iter()
            .map(|child| -> Result<Subreddit> {
                let summary = child.data;
                Ok(Subreddit {
                    id: summary.name,
                    display_name: summary.display_name,
                    url: self.base_url.join(summary.url.trim_start_matches('/'))?.to_string(),
                    url_path: summary.url,
                })
            })
            .collect()
    }

    /// Subreddit info for several subreddits in a single request.
    pub async fn subreddit_info(&self, names: &[&str]) -> Result<Vec<SubredditInfo>> {
        let url = self.url("/api/info.json", &[("sr_name", names.join(","))])?;
        let listing: ListingResponse<SubredditInfo> = self.get_json(url).await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .collect())
    }

    /// One page of posts of `pathname` (`/`, `/r/rust`, `/r/rust/top`, ...).
    pub async fn listing(
        &self,
        pathname: &str,
        after: Option<&str>,
        limit: usize,
    ) -> Result<Page<Post>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }
        let url = self.url(&listing_path(pathname), &query)?;
        let listing: ListingResponse<Post> = self.get_json(url).await?;
        let data = listing.data;

        Ok(Page::new(
            data.children.into_iter().map(|child| child.data).collect(),
            PageInfo { has_next_page: data.after.is_some(), next_cursor: data.after },
        ))
    }
}
