mod config;
mod reader;
mod source;
mod upstream;

pub use config::Config;
pub use reader::ConfigReader;
pub use source::{SourceType, UnsupportedConfigFormat};
pub use upstream::{Batch, Listing, Upstream};
