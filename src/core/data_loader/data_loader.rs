use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_channel::oneshot;
use futures_timer::Delay;
use futures_util::future::{join_all, BoxFuture};
use indexmap::IndexSet;
use tracing::{debug, info_span, warn, Instrument};

use super::cache::HashMapCache;
use super::error::Error;
use super::loader::Loader;
use super::storage::{CacheFactory, CacheStorage};

type LoadResult<T, K> = Result<<T as Loader<K>>::Value, Error<<T as Loader<K>>::Error>>;
type ResSender<T, K> = oneshot::Sender<LoadResult<T, K>>;

/// Keys waiting for the next dispatch together with everybody waiting on a
/// key, whether its batch is still pending or already in flight.
struct Requests<K, T, C>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
    C: CacheFactory<K, T::Value>,
{
    keys: IndexSet<K>,
    waiters: HashMap<K, Vec<ResSender<T, K>>>,
    cache_storage: C::Storage,
}

impl<K, T, C> Requests<K, T, C>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
    C: CacheFactory<K, T::Value>,
{
    fn new(cache_factory: &C) -> Self {
        Self {
            keys: IndexSet::new(),
            waiters: HashMap::new(),
            cache_storage: cache_factory.create(),
        }
    }

    fn take(&mut self) -> Vec<K> {
        self.keys.drain(..).collect()
    }

    fn resolve(&mut self, key: &K, result: LoadResult<T, K>) {
        let waiters = self.waiters.remove(key).unwrap_or_default();
        if let Ok(value) = &result {
            self.cache_storage
                .insert(Cow::Borrowed(key), Cow::Borrowed(value));
        }
        for tx in waiters {
            // The receiver is gone when the caller stopped waiting.
            let _ = tx.send(result.clone());
        }
    }
}

struct DataLoaderInner<K, T, C>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
    C: CacheFactory<K, T::Value>,
{
    requests: Mutex<Requests<K, T, C>>,
    loader: T,
}

impl<K, T, C> DataLoaderInner<K, T, C>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
    C: CacheFactory<K, T::Value>,
{
    fn requests(&self) -> MutexGuard<'_, Requests<K, T, C>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn do_load(&self, keys: &[K]) {
        debug!(batch_size = keys.len(), "dispatching batch");
        let result = self.loader.load(keys).await;

        let mut requests = self.requests();
        match result {
            Ok(mut values) => {
                for key in keys {
                    let result = values.remove(key).ok_or(Error::NotFound);
                    requests.resolve(key, result);
                }
            }
            Err(err) => {
                debug!(batch_size = keys.len(), "batch failed");
                for key in keys {
                    requests.resolve(key, Err(Error::BatchFetch(err.clone())));
                }
            }
        }
    }
}

/// Owns one batch from the moment it is handed to the spawner. Dropping it
/// before the batch resolved (loader panic, runtime shutdown, a spawner that
/// discards the task) fails the batch's waiters with [Error::Canceled] and
/// frees their keys for the next load.
struct BatchTask<K, T, C>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
    C: CacheFactory<K, T::Value>,
{
    inner: Arc<DataLoaderInner<K, T, C>>,
    // `None` until the pending keys are taken.
    keys: Option<Vec<K>>,
    resolved: bool,
}

impl<K, T, C> BatchTask<K, T, C>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
    C: CacheFactory<K, T::Value>,
{
    fn new(inner: Arc<DataLoaderInner<K, T, C>>, keys: Option<Vec<K>>) -> Self {
        Self { inner, keys, resolved: false }
    }

    async fn load(mut self) {
        if self.keys.is_none() {
            self.keys = Some(self.inner.requests().take());
        }
        let keys = self.keys.as_deref().unwrap_or_default();
        if !keys.is_empty() {
            let span = info_span!("batch_fetch", size = keys.len());
            self.inner.do_load(keys).instrument(span).await;
        }
        self.resolved = true;
    }
}

impl<K, T, C> Drop for BatchTask<K, T, C>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
    C: CacheFactory<K, T::Value>,
{
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        let mut requests = self.inner.requests();
        let keys = match self.keys.take() {
            Some(keys) => keys,
            None => requests.take(),
        };
        if !keys.is_empty() {
            warn!(batch_size = keys.len(), "batch dropped before it resolved");
        }
        for key in keys {
            requests.resolve(&key, Err(Error::Canceled));
        }
    }
}

/// Data loader.
///
/// Coalesces concurrent [DataLoader::load_one] calls into batched
/// [Loader::load] calls and caches every successfully resolved value for the
/// lifetime of the loader. A key has at most one fetch in flight; later
/// callers attach to it.
///
/// Reference: <https://github.com/graphql/dataloader>
pub struct DataLoader<
    K: Send + Sync + Eq + Clone + Hash + 'static,
    T: Loader<K>,
    C: CacheFactory<K, T::Value> = HashMapCache,
> {
    inner: Arc<DataLoaderInner<K, T, C>>,
    delay: Duration,
    max_batch_size: usize,
    spawner: Box<dyn Fn(BoxFuture<'static, ()>) + Send + Sync>,
}

impl<K, T> DataLoader<K, T, HashMapCache>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
{
    /// Use `Loader` to create a [DataLoader] backed by a `HashMap` cache.
    ///
    /// `spawner` runs the batch tasks, usually `tokio::spawn`.
    pub fn new<S, R>(loader: T, spawner: S) -> Self
    where
        S: Fn(BoxFuture<'static, ()>) -> R + Send + Sync + 'static,
    {
        Self::with_cache(loader, spawner, HashMapCache::default())
    }
}

impl<K, T, C> DataLoader<K, T, C>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
    C: CacheFactory<K, T::Value>,
{
    /// Use `Loader` to create a [DataLoader] with a cache factory.
    pub fn with_cache<S, R>(loader: T, spawner: S, cache_factory: C) -> Self
    where
        S: Fn(BoxFuture<'static, ()>) -> R + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(DataLoaderInner {
                requests: Mutex::new(Requests::new(&cache_factory)),
                loader,
            }),
            delay: Duration::ZERO,
            max_batch_size: 1000,
            spawner: Box::new(move |fut| {
                spawner(fut);
            }),
        }
    }

    /// Specify how long a batch stays open after its first key, the default
    /// is zero: the batch closes as soon as the scheduler gets control back.
    #[must_use]
    pub fn delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    /// Specify the max batch size for loading data, the default is `1000`.
    ///
    /// If the keys waiting to be loaded reach the threshold, they are loaded
    /// immediately.
    #[must_use]
    pub fn max_batch_size(self, max_batch_size: usize) -> Self {
        Self { max_batch_size: max_batch_size.max(1), ..self }
    }

    /// Get the loader.
    #[inline]
    pub fn loader(&self) -> &T {
        &self.inner.loader
    }

    /// Use this `DataLoader` to load a value.
    ///
    /// Resolves from the cache when possible, otherwise joins the pending
    /// batch (or the in-flight fetch) for `key`.
    pub async fn load_one(&self, key: K) -> LoadResult<T, K> {
        enum Action<K> {
            ImmediateLoad(Vec<K>),
            StartFetch,
            Wait,
        }

        let (action, rx) = {
            let mut guard = self.inner.requests();
            let requests = &mut *guard;
            if let Some(value) = requests.cache_storage.get(&key) {
                debug!("cache hit");
                return Ok(value.clone());
            }

            let (tx, rx) = oneshot::channel();
            let action = match requests.waiters.entry(key.clone()) {
                Entry::Occupied(mut entry) => {
                    debug!("attaching to a pending fetch");
                    entry.get_mut().push(tx);
                    Action::Wait
                }
                Entry::Vacant(entry) => {
                    entry.insert(vec![tx]);
                    let prev_count = requests.keys.len();
                    requests.keys.insert(key);

                    if requests.keys.len() >= self.max_batch_size {
                        Action::ImmediateLoad(requests.take())
                    } else if prev_count == 0 {
                        Action::StartFetch
                    } else {
                        Action::Wait
                    }
                }
            };
            (action, rx)
        };

        match action {
            Action::ImmediateLoad(keys) => self.dispatch(keys),
            Action::StartFetch => self.schedule(),
            Action::Wait => {}
        }

        rx.await.unwrap_or(Err(Error::Canceled))
    }

    /// Load several values, results are returned in the order of `keys`.
    pub async fn load_many<I>(&self, keys: I) -> Vec<LoadResult<T, K>>
    where
        I: IntoIterator<Item = K>,
    {
        join_all(keys.into_iter().map(|key| self.load_one(key))).await
    }

    /// Dispatch the pending batch right away instead of waiting for the end
    /// of the current tick.
    pub fn flush(&self) {
        let keys = self.inner.requests().take();
        if !keys.is_empty() {
            self.dispatch(keys);
        }
    }

    /// Feed some data into the cache.
    pub fn feed_many<I>(&self, values: I)
    where
        I: IntoIterator<Item = (K, T::Value)>,
    {
        let mut requests = self.inner.requests();
        for (key, value) in values {
            requests
                .cache_storage
                .insert(Cow::Owned(key), Cow::Owned(value));
        }
    }

    /// Feed some data into the cache.
    pub fn feed_one(&self, key: K, value: T::Value) {
        self.feed_many(std::iter::once((key, value)));
    }

    /// Gets all values in the cache.
    pub fn get_cached_values(&self) -> HashMap<K, T::Value> {
        self.inner
            .requests()
            .cache_storage
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn dispatch(&self, keys: Vec<K>) {
        let batch = BatchTask::new(self.inner.clone(), Some(keys));
        (self.spawner)(Box::pin(batch.load()));
    }

    fn schedule(&self) {
        let batch = BatchTask::new(self.inner.clone(), None);
        let delay = self.delay;
        let task = async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                Delay::new(delay).await;
            }
            batch.load().await
        };
        (self.spawner)(Box::pin(task));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    /// Resolves every key `k` to `k * 10` except the ones listed in `missing`,
    /// recording each batch it receives.
    #[derive(Default)]
    struct MockLoader {
        batches: Mutex<Vec<Vec<u64>>>,
        missing: HashSet<u64>,
        failures: AtomicUsize,
        latency: Option<Duration>,
    }

    impl MockLoader {
        fn failing(times: usize) -> Self {
            Self { failures: AtomicUsize::new(times), ..Default::default() }
        }

        fn batches(&self) -> Vec<Vec<u64>> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Loader<u64> for MockLoader {
        type Value = u64;
        type Error = String;

        async fn load(&self, keys: &[u64]) -> Result<HashMap<u64, u64>, String> {
            self.batches.lock().unwrap().push(keys.to_vec());
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }

            let failures = self.failures.load(Ordering::SeqCst);
            if failures > 0 {
                self.failures.store(failures - 1, Ordering::SeqCst);
                return Err("connection reset".to_string());
            }

            Ok(keys
                .iter()
                .filter(|k| !self.missing.contains(k))
                .map(|k| (*k, k * 10))
                .collect())
        }
    }

    fn data_loader(loader: MockLoader) -> DataLoader<u64, MockLoader> {
        DataLoader::new(loader, tokio::spawn)
    }

    #[tokio::test]
    async fn test_same_key_in_one_tick_is_fetched_once() {
        let loader = data_loader(MockLoader::default());
        let (a, b) = tokio::join!(loader.load_one(1), loader.load_one(1));

        assert_eq!(a, Ok(10));
        assert_eq!(b, Ok(10));
        assert_eq!(loader.loader().batches(), vec![vec![1]]);
    }

    #[tokio::test]
    async fn test_keys_in_one_tick_share_a_batch() {
        let loader = data_loader(MockLoader::default());
        let actual = loader.load_many([3, 1, 2, 1]).await;

        assert_eq!(actual, vec![Ok(30), Ok(10), Ok(20), Ok(10)]);
        assert_eq!(loader.loader().batches(), vec![vec![3, 1, 2]]);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_fetch() {
        let loader = data_loader(MockLoader::default());
        assert_eq!(loader.load_one(1).await, Ok(10));
        assert_eq!(loader.load_one(1).await, Ok(10));

        assert_eq!(loader.loader().batches().len(), 1);
        assert_eq!(loader.get_cached_values(), HashMap::from([(1, 10)]));
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let loader = data_loader(MockLoader::failing(1));
        let (a, b) = tokio::join!(loader.load_one(1), loader.load_one(2));

        let expected = Err(Error::BatchFetch("connection reset".to_string()));
        assert_eq!(a, expected);
        assert_eq!(b, expected);
        assert!(loader.get_cached_values().is_empty());

        assert_eq!(loader.load_one(1).await, Ok(10));
        assert_eq!(loader.loader().batches(), vec![vec![1, 2], vec![1]]);
    }

    #[tokio::test]
    async fn test_missing_key_fails_only_its_callers() {
        let loader = data_loader(MockLoader {
            missing: HashSet::from([2]),
            ..Default::default()
        });
        let (a, b, c) = tokio::join!(loader.load_one(1), loader.load_one(2), loader.load_one(2));

        assert_eq!(a, Ok(10));
        assert_eq!(b, Err(Error::NotFound));
        assert_eq!(c, Err(Error::NotFound));
        assert_eq!(loader.loader().batches().len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_retried() {
        let loader = data_loader(MockLoader {
            missing: HashSet::from([2]),
            ..Default::default()
        });
        assert!(loader.load_one(2).await.unwrap_err().is_not_found());
        assert!(loader.load_one(2).await.unwrap_err().is_not_found());

        assert_eq!(loader.loader().batches(), vec![vec![2], vec![2]]);
    }

    #[tokio::test]
    async fn test_later_caller_joins_in_flight_fetch() {
        let loader = data_loader(MockLoader {
            latency: Some(Duration::from_millis(50)),
            ..Default::default()
        });
        let late = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            loader.load_one(1).await
        };
        let (a, b) = tokio::join!(loader.load_one(1), late);

        assert_eq!(a, Ok(10));
        assert_eq!(b, Ok(10));
        assert_eq!(loader.loader().batches(), vec![vec![1]]);
    }

    #[tokio::test]
    async fn test_max_batch_size_splits_batches() {
        let loader = data_loader(MockLoader::default()).max_batch_size(2);
        let actual = loader.load_many([1, 2, 3]).await;

        assert_eq!(actual, vec![Ok(10), Ok(20), Ok(30)]);
        assert_eq!(loader.loader().batches(), vec![vec![1, 2], vec![3]]);
    }

    #[tokio::test]
    async fn test_delay_keeps_batch_open() {
        let loader = data_loader(MockLoader::default()).delay(Duration::from_millis(20));
        let late = async {
            tokio::task::yield_now().await;
            loader.load_one(2).await
        };
        let (a, b) = tokio::join!(loader.load_one(1), late);

        assert_eq!((a, b), (Ok(10), Ok(20)));
        assert_eq!(loader.loader().batches(), vec![vec![1, 2]]);
    }

    #[tokio::test]
    async fn test_flush_dispatches_pending_batch() {
        let loader = data_loader(MockLoader::default()).delay(Duration::from_secs(60));
        let flush = async {
            tokio::task::yield_now().await;
            loader.flush();
        };
        let (a, _) = tokio::join!(loader.load_one(7), flush);

        assert_eq!(a, Ok(70));
        assert_eq!(loader.loader().batches(), vec![vec![7]]);
    }

    #[tokio::test]
    async fn test_feed_one_primes_cache() {
        let loader = data_loader(MockLoader::default());
        loader.feed_one(4, 99);

        assert_eq!(loader.load_one(4).await, Ok(99));
        assert!(loader.loader().batches().is_empty());
    }

    /// Panics on its first call, then resolves `k` to `k * 10`.
    #[derive(Default)]
    struct CrashOnceLoader {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Loader<u64> for CrashOnceLoader {
        type Value = u64;
        type Error = String;

        async fn load(&self, keys: &[u64]) -> Result<HashMap<u64, u64>, String> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("loader crashed");
            }
            Ok(keys.iter().map(|k| (*k, k * 10)).collect())
        }
    }

    #[tokio::test]
    async fn test_panicking_loader_cancels_batch_and_frees_key() {
        let loader = DataLoader::new(CrashOnceLoader::default(), tokio::spawn);

        assert_eq!(loader.load_one(1).await, Err(Error::Canceled));
        assert_eq!(loader.load_one(1).await, Ok(10));
        assert_eq!(loader.loader().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_discarded_scheduled_task_cancels_waiters() {
        let loader = DataLoader::new(MockLoader::default(), |_task| ());

        assert_eq!(loader.load_one(1).await, Err(Error::Canceled));
        assert_eq!(loader.load_one(1).await, Err(Error::Canceled));
        assert!(loader.loader().batches().is_empty());
        assert!(loader.get_cached_values().is_empty());
    }

    #[tokio::test]
    async fn test_discarded_immediate_batch_cancels_waiters() {
        let loader = DataLoader::new(MockLoader::default(), |_task| ()).max_batch_size(1);
        let actual = loader.load_many([1, 2]).await;

        assert_eq!(actual, vec![Err(Error::Canceled), Err(Error::Canceled)]);
        assert!(loader.loader().batches().is_empty());
    }
}
