//! Fetch-cache: single-flight get-or-compute memoization
//!
//! Keyed by canonical link. Guarantees that a given key's computation runs at
//! most once per cache lifetime regardless of how many concurrent callers
//! request it: the first caller becomes the leader and runs the computation,
//! later callers subscribe to the leader's outcome. Entries expire after a
//! configured lifetime, after which the next access triggers exactly one
//! fresh computation under the same rule.
//!
//! Failures are not cached: a failed computation is removed before waiters
//! are notified, so the next access retries instead of poisoning the key.
//! The capacity bound evicts the oldest settled entry; an in-flight
//! computation is never evicted. A leader dropped mid-computation releases
//! its key: waiting followers see it as abandoned and the next access
//! starts over.

use crate::config::CacheConfig;
use crate::CacheError;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

enum Slot<V> {
    Ready {
        value: V,
        stored_at: Instant,
    },
    Pending {
        tx: broadcast::Sender<Result<V, CacheError>>,
    },
}

enum Role<V> {
    Leader,
    Follower(broadcast::Receiver<Result<V, CacheError>>),
}

/// Removes the leader's pending slot if the leader future is dropped before
/// it settles the entry. Dropping the slot drops its sender, so waiting
/// followers observe a closed channel and the next access retries.
struct PendingGuard<'a, V> {
    inner: &'a Mutex<HashMap<String, Slot<V>>>,
    key: &'a str,
    armed: bool,
}

impl<V> Drop for PendingGuard<'_, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut map = self.inner.lock().unwrap();
        if matches!(map.get(self.key), Some(Slot::Pending { .. })) {
            map.remove(self.key);
        }
    }
}

/// Get-or-compute memoization store keyed by canonical link
///
/// Entries are immutable after insert; callers only ever observe them
/// through [`FetchCache::get_or_compute`].
pub struct FetchCache<V> {
    inner: Mutex<HashMap<String, Slot<V>>>,
    ttl: Duration,
    capacity: usize,
}

impl<V: Clone + Send + 'static> FetchCache<V> {
    /// Creates a cache with the given entry lifetime and capacity
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Creates a cache from the `[cache]` configuration section
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            Duration::from_secs(config.ttl_secs),
            config.capacity as usize,
        )
    }

    /// Returns the cached value for `key`, computing it if absent or stale
    ///
    /// - If a fresh entry exists, it is returned without invoking `compute`.
    /// - If a computation for `key` is already in flight, this caller waits
    ///   for it and receives the same result (success or failure).
    /// - Otherwise `compute` runs; its success is stored, its failure is
    ///   discarded so the next access retries.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<V, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        let role = {
            let mut map = self.inner.lock().unwrap();
            match map.get(key) {
                Some(Slot::Pending { tx }) => Role::Follower(tx.subscribe()),
                Some(Slot::Ready { value, stored_at }) if stored_at.elapsed() < self.ttl => {
                    return Ok(value.clone());
                }
                _ => {
                    // Vacant or stale: this caller leads the (re)computation.
                    let (tx, _) = broadcast::channel(1);
                    map.insert(key.to_string(), Slot::Pending { tx });
                    Role::Leader
                }
            }
        };

        match role {
            Role::Follower(mut rx) => {
                tracing::trace!(key, "joining in-flight computation");
                match rx.recv().await {
                    Ok(result) => result,
                    Err(_) => Err(CacheError::Abandoned {
                        key: key.to_string(),
                    }),
                }
            }
            Role::Leader => {
                // Guards against this future being dropped mid-compute,
                // e.g. a caller racing the whole run against a timeout.
                // Without cleanup the pending slot would park every later
                // caller for this key forever.
                let mut guard = PendingGuard {
                    inner: &self.inner,
                    key,
                    armed: true,
                };
                let result = match compute().await {
                    Ok(value) => Ok(value),
                    Err(e) => Err(CacheError::Compute {
                        key: key.to_string(),
                        message: format!("{e:#}"),
                    }),
                };
                guard.armed = false;

                let tx = {
                    let mut map = self.inner.lock().unwrap();
                    let tx = match map.remove(key) {
                        Some(Slot::Pending { tx }) => Some(tx),
                        // Cannot happen while we are the leader, but losing a
                        // waiter's slot would be worse than re-inserting it.
                        Some(other) => {
                            map.insert(key.to_string(), other);
                            None
                        }
                        None => None,
                    };

                    if let Ok(value) = &result {
                        map.insert(
                            key.to_string(),
                            Slot::Ready {
                                value: value.clone(),
                                stored_at: Instant::now(),
                            },
                        );
                        Self::evict_excess(&mut map, self.capacity);
                    }
                    tx
                };

                if let Some(tx) = tx {
                    // Errors here just mean no followers are waiting.
                    let _ = tx.send(result.clone());
                }

                result
            }
        }
    }

    /// Number of settled (successfully computed) entries currently retained
    pub fn len(&self) -> usize {
        let map = self.inner.lock().unwrap();
        map.values()
            .filter(|s| matches!(s, Slot::Ready { .. }))
            .count()
    }

    /// True when no settled entries are retained
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evicts oldest settled entries until the capacity bound holds.
    /// Pending slots are never candidates.
    fn evict_excess(map: &mut HashMap<String, Slot<V>>, capacity: usize) {
        loop {
            let ready_count = map
                .values()
                .filter(|s| matches!(s, Slot::Ready { .. }))
                .count();
            if ready_count <= capacity {
                return;
            }

            let oldest = map
                .iter()
                .filter_map(|(k, s)| match s {
                    Slot::Ready { stored_at, .. } => Some((k.clone(), *stored_at)),
                    Slot::Pending { .. } => None,
                })
                .min_by_key(|(_, stored_at)| *stored_at);

            match oldest {
                Some((key, _)) => {
                    tracing::debug!(key, "evicting cache entry over capacity");
                    map.remove(&key);
                }
                None => return,
            }
        }
    }
}
