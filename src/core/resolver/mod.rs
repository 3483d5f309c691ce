mod context;
mod error;
mod subreddit;

pub use context::{DataLoaders, ResolverContext};
pub use error::{FieldError, ResolveError};
pub use subreddit::{
    field_source, resolve_field, resolve_subreddit, resolve_subreddits, FieldSource,
    SubredditList, SUBREDDIT_FIELDS,
};
