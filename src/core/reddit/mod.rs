mod client;
mod listing;
mod model;
mod subreddit_loader;

pub use client::{normalize_path, subreddit_name, RedditClient};
pub use listing::RedditListing;
pub use model::{ListingData, ListingResponse, Post, Subreddit, SubredditInfo, Thing};
pub use subreddit_loader::SubredditInfoLoader;
