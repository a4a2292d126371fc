use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::store::StoreError;

/// Resource families tie cached reads to the writes that stale them.
/// Every cached key belongs to exactly one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    MassSchedule,
    Prayers,
    MediaGallery,
    Announcement,
    SpiritualMessage,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::MassSchedule => "massSchedule",
            Family::Prayers => "prayers",
            Family::MediaGallery => "mediaGallery",
            Family::Announcement => "announcement",
            Family::SpiritualMessage => "spiritualMessage",
        }
    }
}

/// Cache key: the operation name plus its optional argument (e.g. the
/// language for prayer queries).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub family: Family,
    pub op: &'static str,
    pub arg: Option<String>,
}

impl QueryKey {
    pub fn new(family: Family, op: &'static str) -> Self {
        Self {
            family,
            op,
            arg: None,
        }
    }

    pub fn with_arg(family: Family, op: &'static str, arg: impl Into<String>) -> Self {
        Self {
            family,
            op,
            arg: Some(arg.into()),
        }
    }
}

enum Slot {
    /// A completed fetch; the JSON value is served to later reads.
    Ready(Value),
    /// A fetch in flight; the channel fires when it settles.
    Pending(watch::Receiver<bool>),
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, Slot>,
    /// Explicit family -> dependent keys index, invalidated as a unit.
    members: HashMap<Family, HashSet<QueryKey>>,
    /// Bumped on every invalidation so a fetch that was already in flight
    /// when the write landed is not stored as fresh.
    generations: HashMap<Family, u64>,
}

#[derive(Default)]
pub struct QueryCache {
    state: Mutex<CacheState>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Serve `key` from cache, join an in-flight fetch for the same key,
    /// or run `fetch` and cache its result. Fetch errors are returned to
    /// the caller and never cached; waiters on a failed fetch retry with
    /// their own fetcher.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let (tx, generation) = loop {
            let waiter = {
                let mut state = self.lock();
                match state.entries.get(&key) {
                    Some(Slot::Ready(value)) => {
                        let value = value.clone();
                        return decode(value, &key);
                    }
                    Some(Slot::Pending(rx)) => rx.clone(),
                    None => {
                        let (tx, rx) = watch::channel(false);
                        state.entries.insert(key.clone(), Slot::Pending(rx));
                        state.members.entry(key.family).or_default().insert(key.clone());
                        let generation = *state.generations.entry(key.family).or_insert(0);
                        break (tx, generation);
                    }
                }
            };

            let mut waiter = waiter;
            if waiter.changed().await.is_err() {
                // The owning fetch was dropped without settling (its
                // caller went away). Reclaim the slot so reads are not
                // stuck behind a fetch that will never finish.
                let mut state = self.lock();
                if let Some(Slot::Pending(rx)) = state.entries.get(&key) {
                    if rx.same_channel(&waiter) {
                        state.entries.remove(&key);
                    }
                }
            }
        };

        // This read owns the network fetch for the key.
        let result = fetch().await;

        let mut state = self.lock();
        let ours = match state.entries.get(&key) {
            Some(Slot::Pending(rx)) => rx.same_channel(&tx.subscribe()),
            _ => false,
        };
        if ours {
            state.entries.remove(&key);
            match &result {
                Ok(value) => {
                    let current = state.generations.get(&key.family).copied().unwrap_or(0);
                    if current == generation {
                        match serde_json::to_value(value) {
                            Ok(json) => {
                                state.entries.insert(key.clone(), Slot::Ready(json));
                            }
                            Err(e) => {
                                debug!(op = key.op, error = %e, "Failed to encode cached value");
                            }
                        }
                    } else {
                        debug!(op = key.op, "Dropping fetch result that raced an invalidation");
                    }
                }
                Err(e) => {
                    debug!(op = key.op, error = %e, "Fetch failed; nothing cached");
                }
            }
        }
        drop(state);

        // Wake waiters whatever the outcome.
        let _ = tx.send(true);
        result
    }

    /// Drop every cached read in `family` and stale any fetch already in
    /// flight for it. The family's next read refetches from the store.
    pub fn invalidate(&self, family: Family) {
        let mut state = self.lock();
        *state.generations.entry(family).or_insert(0) += 1;
        if let Some(keys) = state.members.remove(&family) {
            debug!(
                family = family.as_str(),
                entries = keys.len(),
                "Invalidating resource family"
            );
            for key in keys {
                state.entries.remove(&key);
            }
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value, key: &QueryKey) -> Result<T, StoreError> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::InvalidResponse(format!("cached {} value: {}", key.op, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn schedule_key() -> QueryKey {
        QueryKey::new(Family::MassSchedule, "getMassSchedule")
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(vec!["06:30".to_string()])
        };

        let first: Vec<String> = cache.fetch(schedule_key(), fetch).await.unwrap();
        let second: Vec<String> = cache.fetch(schedule_key(), fetch).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_fetch() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, StoreError>(7u32)
        };

        let (a, b, c) = tokio::join!(
            cache.fetch(schedule_key(), fetch),
            cache.fetch(schedule_key(), fetch),
            cache.fetch(schedule_key(), fetch),
        );

        assert_eq!(a.unwrap(), 7);
        assert_eq!(b.unwrap(), 7);
        assert_eq!(c.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            Ok::<_, StoreError>(calls.fetch_add(1, Ordering::SeqCst))
        };

        let first: usize = cache.fetch(schedule_key(), fetch).await.unwrap();
        cache.invalidate(Family::MassSchedule);
        let second: usize = cache.fetch(schedule_key(), fetch).await.unwrap();

        assert_eq!(first, 0);
        assert_eq!(second, 1);
    }

    #[tokio::test]
    async fn test_families_are_invalidated_independently() {
        let cache = QueryCache::new();
        let prayer_calls = AtomicUsize::new(0);
        let prayer_key = QueryKey::with_arg(Family::Prayers, "getPrayersByLanguage", "Telugu");
        let fetch_prayers = || async {
            prayer_calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(vec!["Our Father".to_string()])
        };

        let _: Vec<String> = cache.fetch(prayer_key.clone(), fetch_prayers).await.unwrap();
        cache.invalidate(Family::MassSchedule);
        let _: Vec<String> = cache.fetch(prayer_key, fetch_prayers).await.unwrap();

        assert_eq!(prayer_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prayer_languages_are_cached_separately() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(Vec::<String>::new())
        };

        let telugu = QueryKey::with_arg(Family::Prayers, "getPrayersByLanguage", "Telugu");
        let english = QueryKey::with_arg(Family::Prayers, "getPrayersByLanguage", "English");
        let _: Vec<String> = cache.fetch(telugu, fetch).await.unwrap();
        let _: Vec<String> = cache.fetch(english, fetch).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_drops_all_keys_in_family() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(Vec::<String>::new())
        };

        let telugu = QueryKey::with_arg(Family::Prayers, "getPrayersByLanguage", "Telugu");
        let english = QueryKey::with_arg(Family::Prayers, "getPrayersByLanguage", "English");
        let _: Vec<String> = cache.fetch(telugu.clone(), fetch).await.unwrap();
        let _: Vec<String> = cache.fetch(english.clone(), fetch).await.unwrap();

        cache.invalidate(Family::Prayers);
        let _: Vec<String> = cache.fetch(telugu, fetch).await.unwrap();
        let _: Vec<String> = cache.fetch(english, fetch).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        let failing = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<u32, _>(StoreError::ServerError("boom".to_string()))
        };
        let err = cache.fetch(schedule_key(), failing).await;
        assert!(err.is_err());

        let ok = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(9u32)
        };
        let value: u32 = cache.fetch(schedule_key(), ok).await.unwrap();
        assert_eq!(value, 9);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_racing_an_invalidation_is_not_stored() {
        let cache = Arc::new(QueryCache::new());
        let (gate_tx, gate_rx) = tokio::sync::oneshot::channel::<()>();

        let background = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .fetch(schedule_key(), move || async move {
                        gate_rx.await.ok();
                        Ok::<_, StoreError>(1u32)
                    })
                    .await
            })
        };

        // Let the background fetch register its pending slot, then
        // invalidate while it is still in flight.
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.invalidate(Family::MassSchedule);
        gate_tx.send(()).unwrap();

        // The in-flight caller still receives its value.
        let raced = background.await.unwrap().unwrap();
        assert_eq!(raced, 1);

        // But the value must not have been cached: the next read fetches.
        let calls = AtomicUsize::new(0);
        let fresh: u32 = cache
            .fetch(schedule_key(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, StoreError>(2u32)
            })
            .await
            .unwrap();
        assert_eq!(fresh, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
