//! Per-key debounce timers with an externally triggerable flush.
//!
//! A [`Debouncer`] keeps at most one live timer per key. Scheduling a key
//! again cancels the sleeping timer and starts a new one, so only the last
//! scheduled action runs (last-write-wins). [`Debouncer::flush`] runs a
//! pending action right away instead of waiting for its deadline.
//!
//! Once a timer has fired its action is never aborted: superseding or
//! flushing only affects timers that are still sleeping.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use futures::future::{BoxFuture, FutureExt};
use log::trace;
use tokio::task::JoinHandle;

type DeferredAction = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Slot shared by the timer task and flushers; whoever takes the action runs it.
type ActionSlot = Arc<Mutex<Option<DeferredAction>>>;

struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
    action: ActionSlot,
}

struct DebouncerInner<K> {
    timers: Mutex<HashMap<K, PendingTimer>>,
    next_generation: AtomicU64,
}

/// Table of debounce timers keyed by field (or field group).
pub struct Debouncer<K> {
    inner: Arc<DebouncerInner<K>>,
}

impl<K> Clone for Debouncer<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> Default for Debouncer<K>
where
    K: Eq + Hash + Clone + Send + std::fmt::Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + std::fmt::Debug + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DebouncerInner {
                timers: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Cancels any pending timer for `key` and schedules `action` after `delay`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn schedule<F, Fut>(&self, key: K, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let deferred: DeferredAction = Box::new(move || action().boxed());
        let slot: ActionSlot = Arc::new(Mutex::new(Some(deferred)));
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);

        let mut timers = lock(&self.inner.timers);

        let inner = Arc::clone(&self.inner);
        let fire_key = key.clone();
        let fire_slot = Arc::clone(&slot);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut timers = lock(&inner.timers);
                if timers
                    .get(&fire_key)
                    .is_some_and(|pending| pending.generation == generation)
                {
                    timers.remove(&fire_key);
                }
            }
            let action = lock(&fire_slot).take();
            if let Some(action) = action {
                trace!("Debounce timer fired for {fire_key:?}");
                action().await;
            }
        });

        let replaced = timers.insert(
            key.clone(),
            PendingTimer {
                generation,
                handle,
                action: slot,
            },
        );
        drop(timers);

        if let Some(previous) = replaced {
            // Only a timer whose action is still in its slot is asleep.
            if lock(&previous.action).take().is_some() {
                previous.handle.abort();
                trace!("Superseded pending timer for {key:?}");
            }
        }
    }

    /// Runs the pending action for `key` now and cancels its timer.
    ///
    /// Returns the handle of the spawned action, or `None` when nothing was
    /// pending. Panics outside a tokio runtime if an action is pending.
    pub fn flush(&self, key: &K) -> Option<JoinHandle<()>> {
        let pending = lock(&self.inner.timers).remove(key)?;
        Self::fire_now(pending)
    }

    /// Runs every pending action now.
    pub fn flush_all(&self) -> Vec<JoinHandle<()>> {
        let drained: Vec<PendingTimer> = lock(&self.inner.timers)
            .drain()
            .map(|(_, pending)| pending)
            .collect();
        drained.into_iter().filter_map(Self::fire_now).collect()
    }

    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.inner.timers).contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.inner.timers).len()
    }

    fn fire_now(pending: PendingTimer) -> Option<JoinHandle<()>> {
        let action = lock(&pending.action).take()?;
        pending.handle.abort();
        Some(tokio::spawn(action()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) -> BoxFuture<'static, ()> + Clone) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let record = move |value: u32| {
            let sink = Arc::clone(&sink);
            async move { sink.lock().unwrap().push(value) }.boxed()
        };
        (seen, record)
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_write_wins() {
        let debouncer = Debouncer::new();
        let (seen, record) = recorder();

        for value in 1..=5 {
            let record = record.clone();
            debouncer.schedule("area", Duration::from_millis(300), move || record(value));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(seen.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(*seen.lock().unwrap(), vec![5]);
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let debouncer = Debouncer::new();
        let (seen, record) = recorder();

        let first = record.clone();
        debouncer.schedule("a", Duration::from_millis(300), move || first(1));
        let second = record.clone();
        debouncer.schedule("b", Duration::from_millis(500), move || second(2));

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert!(debouncer.is_pending(&"b"));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_runs_immediately_once() {
        let debouncer = Debouncer::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        debouncer.schedule("area", Duration::from_millis(300), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let handle = debouncer.flush(&"area").expect("pending action");
        handle.await.unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending(&"area"));

        // The cancelled timer must not fire a second time.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(debouncer.flush(&"area").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_all_runs_every_key() {
        let debouncer = Debouncer::new();
        let (seen, record) = recorder();

        for (key, value) in [("a", 1), ("b", 2)] {
            let record = record.clone();
            debouncer.schedule(key, Duration::from_millis(300), move || record(value));
        }
        for handle in debouncer.flush_all() {
            handle.await.unwrap();
        }
        let mut values = seen.lock().unwrap().clone();
        values.sort();
        assert_eq!(values, vec![1, 2]);
        assert_eq!(debouncer.pending_count(), 0);

        // Flushed timers do not fire again.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
