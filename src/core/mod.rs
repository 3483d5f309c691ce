#![allow(clippy::module_inception)]

pub mod config;
pub mod data_loader;
pub mod error;
pub mod http;
pub mod listing;
pub mod reddit;
pub mod resolver;
pub mod runtime;
pub mod tracing;

use bytes::Bytes;
pub use error::{Error, Result};
use http::Response;

#[async_trait::async_trait]
pub trait HttpIO: Sync + Send + 'static {
    async fn execute(&self, request: reqwest::Request) -> anyhow::Result<Response<Bytes>>;
}

pub fn is_default<T: Default + Eq>(val: &T) -> bool {
    *val == T::default()
}
