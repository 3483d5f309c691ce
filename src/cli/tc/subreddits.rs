use std::sync::Arc;

use anyhow::Result;

use crate::cli::{runtime, Fmt};
use crate::core::config::Config;
use crate::core::reddit::RedditClient;
use crate::core::resolver::{resolve_subreddits, ResolverContext};

pub(super) async fn subreddits_command(
    config: Config,
    limit: Option<usize>,
    fields: Vec<String>,
) -> Result<()> {
    let runtime = runtime::init(&config.upstream)?;
    let client = Arc::new(RedditClient::new(runtime, &config.upstream)?);

    let subreddits = client
        .top_subreddits(limit.unwrap_or(config.listing.top_limit))
        .await?;
    let ctx = ResolverContext::new(client, &config.batch);
    let list = resolve_subreddits(&ctx, &subreddits, &fields).await?;

    for error in &list.errors {
        tracing::warn!("{}: {}", error.path.join("."), error.message);
    }
    Fmt::display(Fmt::json(&list)?);
    Ok(())
}
