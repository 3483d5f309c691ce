use std::collections::HashMap;
use std::hash::Hash;

/// Trait for batch loading.
///
/// A single call receives every distinct key of one batch. Keys the source
/// could not resolve are left out of the returned map.
#[async_trait::async_trait]
pub trait Loader<K: Send + Sync + Hash + Eq + Clone + 'static>: Send + Sync + 'static {
    /// type of value.
    type Value: Send + Sync + Clone + 'static;

    /// Type of error. It is cloned once for every caller waiting on the
    /// failed batch.
    type Error: Send + Sync + Clone + 'static;

    /// Load the data set specified by the `keys`.
    async fn load(&self, keys: &[K]) -> Result<HashMap<K, Self::Value>, Self::Error>;
}
