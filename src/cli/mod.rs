mod command;
mod fmt;
pub mod runtime;
mod tc;

pub use fmt::Fmt;
pub use tc::run;
