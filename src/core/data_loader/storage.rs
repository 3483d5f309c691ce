use std::borrow::Cow;
use std::hash::Hash;

/// Cache storage for [DataLoader](super::DataLoader).
///
/// Entries are only ever added: the loader never evicts a resolved value.
pub trait CacheStorage: Send + Sync + 'static {
    /// The key type of the record.
    type Key: Send + Sync + Clone + Eq + Hash + 'static;

    /// The value type of the record.
    type Value: Send + Sync + Clone + 'static;

    /// Returns a reference to the value of the key in the cache or None if it
    /// is not present in the cache.
    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    /// Puts a key-value pair into the cache. If the key already exists in the
    /// cache, then it updates the key's value.
    fn insert(&mut self, key: Cow<'_, Self::Key>, val: Cow<'_, Self::Value>);

    /// Number of cached records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the key-value pairs in the cache.
    fn iter(&self) -> Box<dyn Iterator<Item = (&'_ Self::Key, &'_ Self::Value)> + '_>;
}

/// Builds the storage a [DataLoader](super::DataLoader) starts with. Every
/// loader gets a fresh, empty storage.
pub trait CacheFactory<K, V>: Send + Sync + 'static
where
    K: Send + Sync + Clone + Eq + Hash + 'static,
    V: Send + Sync + Clone + 'static,
{
    type Storage: CacheStorage<Key = K, Value = V>;

    fn create(&self) -> Self::Storage;
}
