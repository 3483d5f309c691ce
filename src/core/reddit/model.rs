use serde::{Deserialize, Serialize};

use crate::core::listing::Identity;

/// Reddit's envelope around every object: `{"kind": "t3", "data": {...}}`.
#[derive(Deserialize, Debug, Clone)]
pub struct Thing<T> {
    #[serde(default)]
    pub kind: String,
    pub data: T,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ListingData<T> {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
}

pub type ListingResponse<T> = Thing<ListingData<T>>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub thumbnail: String,
    pub title: String,
    pub url: String,
}

impl Identity for Post {
    fn identity(&self) -> &str {
        &self.name
    }
}

/// Supplemental data fetched per subreddit through the batch loader.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubredditInfo {
    pub display_name: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub public_description: String,
    #[serde(default)]
    pub subscribers: Option<u64>,
}

/// Subreddit as it appears in the popular subreddits listing.
#[derive(Deserialize, Debug, Clone)]
pub struct SubredditSummary {
    pub name: String,
    pub display_name: String,
    pub url: String,
}

/// Subreddit entity handed to the resolvers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subreddit {
    pub id: String,
    pub display_name: String,
    pub url_path: String,
    pub url: String,
}
