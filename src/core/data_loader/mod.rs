mod cache;
mod data_loader;
mod error;
mod loader;
mod storage;

pub use cache::{HashMapCache, HashMapCacheImpl};
pub use data_loader::DataLoader;
pub use error::Error;
pub use loader::Loader;
pub use storage::{CacheFactory, CacheStorage};
