mod listing;
mod run;
mod subreddits;

pub use run::run;
