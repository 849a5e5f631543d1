use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::debug;
use tokio::sync::Mutex;

use super::error::FetchError;
use crate::models::Transaction;

/// Key addressing one cached aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Sentinel for the combined view across every wallet.
    AllTransactions,
    Wallet(i64),
}

type CachedResult = Result<Arc<Vec<Transaction>>, Arc<FetchError>>;
type PendingFetch = Shared<BoxFuture<'static, CachedResult>>;

/// Single-flight store for transaction aggregations.
///
/// At most one aggregation is in flight per key: a second caller arriving
/// while the first is still pending joins the same shared future instead
/// of triggering a duplicate fetch. Resolved entries are served without
/// network access. A failed entry is removed before the error is
/// surfaced, so the next request for that key starts a fresh fetch rather
/// than observing a cached failure forever.
///
/// The store has no expiry of its own; the owner clears it when the
/// enclosing session is torn down.
#[derive(Default)]
pub struct FetchCache {
    entries: Mutex<HashMap<CacheKey, PendingFetch>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the aggregation for `key`, invoking `producer` only when no
    /// entry (pending or resolved) exists.
    ///
    /// The pending entry is inserted in the same critical section that
    /// checked for its absence, with no suspension point on the producer in
    /// between, so concurrent callers can never race it into a duplicate
    /// invocation.
    pub async fn get_or_fetch<F, Fut>(&self, key: CacheKey, producer: F) -> CachedResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Transaction>, FetchError>> + Send + 'static,
    {
        let entry = {
            let mut entries = self.entries.lock().await;
            match entries.get(&key) {
                Some(existing) => existing.clone(),
                None => {
                    let fetch = producer()
                        .map(|result| result.map(Arc::new).map_err(Arc::new))
                        .boxed()
                        .shared();
                    entries.insert(key.clone(), fetch.clone());
                    fetch
                },
            }
        };

        let result = entry.clone().await;

        if result.is_err() {
            // Evict only the entry we actually awaited; a retry may have
            // replaced it with a fresh fetch already.
            let mut entries = self.entries.lock().await;
            if entries.get(&key).is_some_and(|current| current.ptr_eq(&entry)) {
                entries.remove(&key);
                debug!(key:? = key; "Evicted failed cache entry");
            }
        }

        result
    }

    /// Drops the entry for `key`, forcing the next request to refetch.
    pub async fn invalidate(&self, key: &CacheKey) {
        self.entries.lock().await.remove(key);
    }

    /// Drops every entry. The owner calls this when the enclosing session
    /// ends; the cache does not decide when.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::fetch::ResourceKind;
    use crate::http::HttpError;

    fn tx(label: &str) -> Transaction {
        serde_json::from_value(json!({
            "date": "2024-03-01T12:00:00Z",
            "type": "deposit",
            "label": label,
            "cost_basis_method": "FIFO",
        }))
        .unwrap()
    }

    fn failure() -> FetchError {
        let source = HttpError::DecodeError(serde_json::from_str::<u32>("nope").unwrap_err());
        FetchError::page_fetch(ResourceKind::Transactions, 1, source)
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_producer_invocation() {
        let cache = FetchCache::new();
        let calls = Arc::new(AtomicU32::new(0));

        let producer = |calls: Arc<AtomicU32>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(vec![tx("shared")])
            }
        };

        let (a, b) = tokio::join!(
            cache.get_or_fetch(CacheKey::Wallet(7), producer(calls.clone())),
            cache.get_or_fetch(CacheKey::Wallet(7), producer(calls.clone())),
        );

        let a = a.unwrap();
        let b = b.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolved_entry_is_served_without_refetch() {
        let cache = FetchCache::new();
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let result = cache
                .get_or_fetch(CacheKey::AllTransactions, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(vec![tx("cached")]) }
                })
                .await
                .unwrap();
            assert_eq!(result.len(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_keys_fetch_independently() {
        let cache = FetchCache::new();
        let calls = AtomicU32::new(0);

        for id in [1, 2] {
            cache
                .get_or_fetch(CacheKey::Wallet(id), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(vec![]) }
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_entry_is_evicted_and_refetched() {
        let cache = FetchCache::new();

        let failed = cache
            .get_or_fetch(CacheKey::Wallet(9), || async { Err(failure()) })
            .await;
        assert!(failed.is_err());

        let retried = AtomicU32::new(0);
        let result = cache
            .get_or_fetch(CacheKey::Wallet(9), || {
                retried.fetch_add(1, Ordering::SeqCst);
                async { Ok(vec![tx("second attempt")]) }
            })
            .await
            .unwrap();

        assert_eq!(retried.load(Ordering::SeqCst), 1);
        assert_eq!(result[0].label.as_deref(), Some("second attempt"));
    }

    #[tokio::test]
    async fn invalidate_forces_a_fresh_fetch() {
        let cache = FetchCache::new();
        let calls = AtomicU32::new(0);

        let fetch = || {
            cache.get_or_fetch(CacheKey::Wallet(4), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(vec![]) }
            })
        };

        fetch().await.unwrap();
        cache.invalidate(&CacheKey::Wallet(4)).await;
        fetch().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_drops_every_entry() {
        let cache = FetchCache::new();
        let calls = AtomicU32::new(0);

        for id in [1, 2] {
            cache
                .get_or_fetch(CacheKey::Wallet(id), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(vec![]) }
                })
                .await
                .unwrap();
        }

        cache.clear().await;

        for id in [1, 2] {
            cache
                .get_or_fetch(CacheKey::Wallet(id), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(vec![]) }
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
