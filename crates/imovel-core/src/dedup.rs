//! In-flight request deduplication and a memoizing read cache.
//!
//! [`RequestDeduplicator`] lets concurrent callers asking for the same key
//! share one network round-trip. The entry lives only while the request is in
//! flight: once it settles, success or failure, the next call starts a fresh
//! request.
//!
//! [`ReadCache`] adds memoization of successful results on top, for
//! reference data that rarely changes.

use std::{
    collections::HashMap,
    fmt::Debug,
    future::Future,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::trace;

use crate::error::{Result, WizardError};

type SharedRequest<T> = Shared<BoxFuture<'static, std::result::Result<T, Arc<WizardError>>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shares one in-flight future per key among all concurrent callers.
pub struct RequestDeduplicator<K, T> {
    inflight: Arc<Mutex<HashMap<K, SharedRequest<T>>>>,
}

impl<K, T> Clone for RequestDeduplicator<K, T> {
    fn clone(&self) -> Self {
        Self {
            inflight: Arc::clone(&self.inflight),
        }
    }
}

impl<K, T> Default for RequestDeduplicator<K, T> {
    fn default() -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, T> RequestDeduplicator<K, T>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the in-flight request for `key`, or starts one with `factory`.
    ///
    /// The request is registered synchronously, before the returned future is
    /// first polled, so callers in the same tick always share it. A failure is
    /// delivered to every waiter as [`WizardError::Shared`].
    pub fn dedupe<F, Fut>(&self, key: K, factory: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let request = {
            let mut inflight = lock(&self.inflight);
            match inflight.get(&key) {
                Some(existing) => {
                    trace!("Joining in-flight request {key:?}");
                    existing.clone()
                }
                None => {
                    let table = Arc::clone(&self.inflight);
                    let settle_key = key.clone();
                    let fetch = factory();
                    let request = async move {
                        let outcome = fetch.await.map_err(Arc::new);
                        lock(&table).remove(&settle_key);
                        outcome
                    }
                    .boxed()
                    .shared();
                    inflight.insert(key, request.clone());
                    // Drive the request to completion even if every waiter
                    // goes away, so the entry is always released.
                    let _ = tokio::spawn(request.clone());
                    request
                }
            }
        };
        async move { request.await.map_err(WizardError::from) }
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        lock(&self.inflight).contains_key(key)
    }
}

/// Memoizes successful results per key, deduplicating concurrent misses.
pub struct ReadCache<K, T> {
    values: Arc<Mutex<HashMap<K, T>>>,
    requests: RequestDeduplicator<K, T>,
}

impl<K, T> Clone for ReadCache<K, T> {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
            requests: self.requests.clone(),
        }
    }
}

impl<K, T> Default for ReadCache<K, T> {
    fn default() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
            requests: RequestDeduplicator::default(),
        }
    }
}

impl<K, T> ReadCache<K, T>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized value, or fetches and memoizes it on success.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, factory: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(value) = self.get(&key) {
            trace!("Serving {key:?} from cache");
            return Ok(value);
        }
        let value = self.requests.dedupe(key.clone(), factory).await?;
        lock(&self.values).insert(key, value.clone());
        Ok(value)
    }

    /// Drops the memoized value and fetches again. A success replaces the
    /// memoized value; a failure leaves nothing memoized.
    pub async fn fetch_fresh<F, Fut>(&self, key: K, factory: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        self.invalidate(&key);
        self.get_or_fetch(key, factory).await
    }

    pub fn get(&self, key: &K) -> Option<T> {
        lock(&self.values).get(key).cloned()
    }

    pub fn invalidate(&self, key: &K) {
        lock(&self.values).remove(key);
    }

    pub fn clear(&self) {
        lock(&self.values).clear();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use super::*;

    fn counted_fetch(
        calls: &Arc<AtomicUsize>,
        value: u32,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<u32>> {
        let calls = Arc::clone(calls);
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_request() {
        let dedup: RequestDeduplicator<&str, u32> = RequestDeduplicator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = dedup.dedupe("medidas", counted_fetch(&calls, 1));
        let second = dedup.dedupe("medidas", counted_fetch(&calls, 2));
        assert!(dedup.is_in_flight(&"medidas"));

        let (a, b) = tokio::join!(first, second);
        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!dedup.is_in_flight(&"medidas"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_request_is_not_reused() {
        let dedup: RequestDeduplicator<&str, u32> = RequestDeduplicator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(dedup.dedupe("preco", counted_fetch(&calls, 1)).await.unwrap(), 1);
        assert_eq!(dedup.dedupe("preco", counted_fetch(&calls, 2)).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_reaches_every_waiter_and_releases_key() {
        let dedup: RequestDeduplicator<&str, u32> = RequestDeduplicator::new();

        let failing = || async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err::<u32, _>(WizardError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        };
        let first = dedup.dedupe("x", failing);
        let second = dedup.dedupe("x", || async { Ok(9) });
        let (a, b) = tokio::join!(first, second);
        assert!(matches!(a, Err(WizardError::Shared(_))));
        assert!(b.is_err());

        assert_eq!(dedup.dedupe("x", || async { Ok(9) }).await.unwrap(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_cache_memoizes_success() {
        let cache: ReadCache<&str, u32> = ReadCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(cache.get_or_fetch("opcoes", counted_fetch(&calls, 4)).await.unwrap(), 4);
        assert_eq!(cache.get_or_fetch("opcoes", counted_fetch(&calls, 5)).await.unwrap(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(cache.fetch_fresh("opcoes", counted_fetch(&calls, 6)).await.unwrap(), 6);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get(&"opcoes"), Some(6));
        assert_eq!(cache.get_or_fetch("opcoes", counted_fetch(&calls, 7)).await.unwrap(), 6);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_cache_does_not_memoize_failure() {
        let cache: ReadCache<&str, u32> = ReadCache::new();
        let err = cache
            .get_or_fetch("opcoes", || async {
                Err(WizardError::Configuration {
                    message: "offline".to_string(),
                })
            })
            .await;
        assert!(err.is_err());
        assert_eq!(cache.get(&"opcoes"), None);
        assert_eq!(cache.get_or_fetch("opcoes", || async { Ok(1) }).await.unwrap(), 1);
    }
}
