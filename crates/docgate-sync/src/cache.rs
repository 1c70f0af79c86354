//! Async resource cache
//!
//! One [`AsyncResource`] per logical resource: a named cache entry with an
//! infallible async fetcher, a staleness window, and a poll interval.
//! Invalidation flags the entry stale without discarding the last-known
//! value, so readers can keep rendering it while the refetch is in flight
//! (stale-while-revalidate). No eviction: the working set is two entries
//! that live for the process lifetime.
//!
//! The clock is `tokio::time::Instant`, so paused-time tests are exact.

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// A cached value with its fetch time.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// Last value fetched
    pub value: T,
    /// When it was fetched
    pub fetched_at: Instant,
    stale: bool,
}

impl<T> CacheEntry<T> {
    /// Whether the entry has been explicitly invalidated.
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, T> + Send + Sync>;

/// One keyed cache entry with polling and staleness semantics.
///
/// Cloning shares the underlying entry; a poller and a mutation
/// controller holding clones see each other's effects.
pub struct AsyncResource<T> {
    name: &'static str,
    poll_interval: Duration,
    staleness_window: Duration,
    fetcher: Fetcher<T>,
    entry: Arc<RwLock<Option<CacheEntry<T>>>>,
    fetches: Arc<AtomicU64>,
}

impl<T> Clone for AsyncResource<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            poll_interval: self.poll_interval,
            staleness_window: self.staleness_window,
            fetcher: self.fetcher.clone(),
            entry: self.entry.clone(),
            fetches: self.fetches.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> AsyncResource<T> {
    /// Create a resource with its fetcher and timing parameters.
    ///
    /// The fetcher is infallible by contract: read-path error absorption
    /// happens inside it (see the pollers).
    pub fn new<F, Fut>(
        name: &'static str,
        poll_interval: Duration,
        staleness_window: Duration,
        fetcher: F,
    ) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self {
            name,
            poll_interval,
            staleness_window,
            fetcher: Arc::new(move || fetcher().boxed()),
            entry: Arc::new(RwLock::new(None)),
            fetches: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Resource name (cache key).
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Maximum time between unconditional background refetches.
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Window within which a read is served from cache without a fetch.
    #[inline]
    #[must_use]
    pub fn staleness_window(&self) -> Duration {
        self.staleness_window
    }

    /// Number of fetches issued so far.
    #[inline]
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Read the resource: cached value if fresh, otherwise fetch, store,
    /// and return.
    pub async fn read(&self) -> T {
        if let Some(value) = self.fresh_value() {
            return value;
        }
        self.refresh().await
    }

    /// Unconditional fetch + store, used by the background poller and by
    /// reads that miss.
    pub async fn refresh(&self) -> T {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(resource = self.name, "refetching");
        let value = (self.fetcher)().await;
        *self.entry.write() = Some(CacheEntry {
            value: value.clone(),
            fetched_at: Instant::now(),
            stale: false,
        });
        value
    }

    /// Mark the entry stale. The last-known value stays available via
    /// [`last_known`](Self::last_known); the next read refetches.
    pub fn invalidate(&self) {
        if let Some(entry) = self.entry.write().as_mut() {
            entry.stale = true;
            tracing::debug!(resource = self.name, "invalidated");
        }
    }

    /// Last-known value, regardless of freshness. Never blocks on a fetch.
    #[must_use]
    pub fn last_known(&self) -> Option<T> {
        self.entry.read().as_ref().map(|entry| entry.value.clone())
    }

    /// Spawn the background poller: an unconditional refresh on every
    /// poll interval, independent of staleness or invalidation.
    pub fn start_polling(&self) -> JoinHandle<()> {
        let resource = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(resource.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // First tick fires immediately: the initial fetch.
                ticker.tick().await;
                resource.refresh().await;
            }
        })
    }

    fn fresh_value(&self) -> Option<T> {
        let guard = self.entry.read();
        let entry = guard.as_ref()?;
        if !entry.stale && entry.fetched_at.elapsed() < self.staleness_window {
            Some(entry.value.clone())
        } else {
            None
        }
    }
}
