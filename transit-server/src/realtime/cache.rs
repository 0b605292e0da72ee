//! Process-wide TTL cache for the real-time feed.
//!
//! One snapshot, one mutex. The lock is held for the full duration of a
//! cache-miss refresh, which serializes concurrent refreshes into a single
//! upstream call (single-flight). A failed refresh leaves the stale
//! snapshot in place for bookkeeping but the failure is always returned to
//! the caller; the stale payload is never served as a fallback.

use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::client::FeedFetch;
use super::error::FeedError;

/// How long a fetched payload stays fresh.
pub const FEED_TTL: Duration = Duration::from_secs(20);

/// A captured feed payload.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub payload: Bytes,
    pub fetched_at: Instant,
}

/// TTL-bounded cache fronting the vendor feed.
pub struct RealtimeFeedCache {
    fetcher: Box<dyn FeedFetch>,
    ttl: Duration,
    state: Mutex<Option<FeedSnapshot>>,
}

impl RealtimeFeedCache {
    /// Create a cache with the default TTL.
    pub fn new(fetcher: impl FeedFetch + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            ttl: FEED_TTL,
            state: Mutex::new(None),
        }
    }

    /// Override the TTL (for testing).
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The current payload: the cached one if fresh, otherwise the result
    /// of exactly one upstream fetch performed while the lock is held.
    pub async fn get(&self) -> Result<Bytes, FeedError> {
        let mut state = self.state.lock().await;

        if let Some(snapshot) = state.as_ref() {
            if snapshot.fetched_at.elapsed() < self.ttl {
                return Ok(snapshot.payload.clone());
            }
        }

        // Stale or empty: refresh while still holding the lock. On error
        // the old snapshot stays untouched.
        let payload = self.fetcher.fetch().await?;
        *state = Some(FeedSnapshot {
            payload: payload.clone(),
            fetched_at: Instant::now(),
        });

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex as AsyncMutex;

    /// Fetcher that serves a scripted sequence of results and counts calls.
    struct ScriptedFetcher {
        calls: Arc<AtomicUsize>,
        script: AsyncMutex<Vec<Result<Bytes, FeedError>>>,
    }

    impl ScriptedFetcher {
        fn new(script: Vec<Result<Bytes, FeedError>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: calls.clone(),
                    script: AsyncMutex::new(script),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl FeedFetch for ScriptedFetcher {
        async fn fetch(&self) -> Result<Bytes, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().await;
            script.remove(0)
        }
    }

    fn ok(payload: &str) -> Result<Bytes, FeedError> {
        Ok(Bytes::from(payload.to_string()))
    }

    fn upstream_failure() -> Result<Bytes, FeedError> {
        Err(FeedError::UpstreamStatus { status: 503 })
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_snapshot_served_without_upstream_call() {
        let (fetcher, calls) = ScriptedFetcher::new(vec![ok("A")]);
        let cache = RealtimeFeedCache::new(fetcher);

        assert_eq!(cache.get().await.unwrap(), Bytes::from("A"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.get().await.unwrap(), Bytes::from("A"));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "no second upstream call");
    }

    #[tokio::test(start_paused = true)]
    async fn expired_snapshot_triggers_exactly_one_new_call() {
        let (fetcher, calls) = ScriptedFetcher::new(vec![ok("A"), ok("B")]);
        let cache = RealtimeFeedCache::new(fetcher);

        assert_eq!(cache.get().await.unwrap(), Bytes::from("A"));

        tokio::time::advance(Duration::from_secs(25)).await;
        assert_eq!(cache.get().await.unwrap(), Bytes::from("B"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_boundary_is_exact() {
        let (fetcher, calls) = ScriptedFetcher::new(vec![ok("A"), ok("B")]);
        let cache = RealtimeFeedCache::new(fetcher);

        cache.get().await.unwrap();
        // One nanosecond short of the TTL: still fresh
        tokio::time::advance(FEED_TTL - Duration::from_nanos(1)).await;
        assert_eq!(cache.get().await.unwrap(), Bytes::from("A"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Crossing the boundary: refresh
        tokio::time::advance(Duration::from_nanos(1)).await;
        assert_eq!(cache.get().await.unwrap(), Bytes::from("B"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_returns_error_not_stale_payload() {
        let (fetcher, _) = ScriptedFetcher::new(vec![ok("A"), upstream_failure(), ok("B")]);
        let cache = RealtimeFeedCache::new(fetcher);

        assert_eq!(cache.get().await.unwrap(), Bytes::from("A"));

        tokio::time::advance(Duration::from_secs(25)).await;
        // Stale "A" exists but the failure must surface
        assert!(cache.get().await.is_err());

        // The stale snapshot was preserved, and the next attempt replaces it
        assert_eq!(cache.get().await.unwrap(), Bytes::from("B"));
    }

    #[tokio::test(start_paused = true)]
    async fn initial_failure_leaves_cache_empty() {
        let (fetcher, calls) = ScriptedFetcher::new(vec![upstream_failure(), ok("A")]);
        let cache = RealtimeFeedCache::new(fetcher);

        assert!(cache.get().await.is_err());
        assert_eq!(cache.get().await.unwrap(), Bytes::from("A"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_collapse_into_one_fetch() {
        let (fetcher, calls) = ScriptedFetcher::new(vec![ok("A")]);
        let cache = Arc::new(RealtimeFeedCache::new(fetcher));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move { cache.get().await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), Bytes::from("A"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_ttl_respected() {
        let (fetcher, calls) = ScriptedFetcher::new(vec![ok("A"), ok("B")]);
        let cache = RealtimeFeedCache::new(fetcher).with_ttl(Duration::from_secs(2));

        cache.get().await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.get().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get().await.unwrap(), Bytes::from("B"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
