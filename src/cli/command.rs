use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "reddio", version, about = "Batched reddit lookups and paginated listings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolves fields of the most popular subreddits
    Subreddits {
        /// Path of a JSON or YAML configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Number of subreddits, defaults to `listing.topLimit`
        #[arg(short, long)]
        limit: Option<usize>,

        /// Fields to resolve for every subreddit
        #[arg(
            short,
            long,
            value_delimiter = ',',
            default_value = "displayName,title,publicDescription,subscriberCount"
        )]
        fields: Vec<String>,
    },

    /// Loads posts of a reddit path, merging successive pages
    Listing {
        /// Path to list, e.g. `/r/rust` or `/` for the front page
        pathname: String,

        /// Path of a JSON or YAML configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
}
