use std::sync::Arc;

use anyhow::Result;

use crate::cli::{runtime, Fmt};
use crate::core::config::Config;
use crate::core::listing::{ListingController, Presentation};
use crate::core::reddit::{RedditClient, RedditListing};

pub(super) async fn listing_command(config: Config, pathname: &str, pages: usize) -> Result<()> {
    let runtime = runtime::init(&config.upstream)?;
    let client = Arc::new(RedditClient::new(runtime, &config.upstream)?);
    let listing = ListingController::new(RedditListing::new(
        client,
        pathname,
        config.listing.page_size,
    ));

    listing.load().await?;
    for _ in 1..pages {
        if !listing.load_next_page().await? {
            break;
        }
    }

    match listing.presentation() {
        Presentation::Ready(view) => {
            tracing::info!(posts = view.items.len(), "listing loaded");
            Fmt::display(Fmt::json(&view)?);
            Ok(())
        }
        Presentation::Failed(err) => Err(err.into()),
        Presentation::Loading => anyhow::bail!("Listing for {} did not load", pathname),
    }
}
