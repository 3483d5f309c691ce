use derive_more::From;

use super::config::UnsupportedConfigFormat;

#[derive(From, thiserror::Error, Debug)]
pub enum Error {
    #[error("Std IO Error: {}", _0)]
    StdIO(std::io::Error),

    #[error("Serde Json Error: {}", _0)]
    SerdeJson(serde_json::Error),

    #[error("Serde Yaml Error: {}", _0)]
    SerdeYaml(serde_yaml::Error),

    #[error("URL Parse Error: {}", _0)]
    UrlParse(url::ParseError),

    #[error("Unsupported Config Format: {}", _0)]
    UnsupportedConfigFormat(UnsupportedConfigFormat),

    #[error("Error: {}", _0)]
    Anyhow(anyhow::Error),
}

pub type Result<A, E = Error> = std::result::Result<A, E>;
