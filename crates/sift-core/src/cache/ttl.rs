use derive_more::Add;
use std::{
    collections::HashMap,
    hash::Hash,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};
use tracing::{debug, trace};

///
/// CacheStats
///

#[derive(Add, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
}

///
/// TtlCache
///
/// Whole-entry cache with expiry. Loads run outside the lock; the flush
/// generation observed before a load must still be current when its result
/// is stored, so a load that overlaps a flush is returned but never cached.
///

pub struct TtlCache<K, V> {
    name: &'static str,
    ttl: Duration,
    state: Mutex<CacheState<K, V>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

struct CacheState<K, V> {
    generation: u64,
    entries: HashMap<K, Entry<V>>,
}

struct Entry<V> {
    value: Arc<V>,
    // None when `now + ttl` does not fit in an Instant
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// A zero `ttl` disables caching: every lookup loads.
    #[must_use]
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            state: Mutex::new(CacheState {
                generation: 0,
                entries: HashMap::new(),
            }),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Return the live entry for `key`, or run `load` and cache its result.
    /// Load errors are returned and never cached.
    pub fn get_or_try_load<E>(
        &self,
        key: &K,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if !self.is_enabled() {
            return load().map(Arc::new);
        }

        let generation = {
            let state = self.lock();
            if let Some(entry) = state.entries.get(key)
                && entry.is_live(Instant::now())
            {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(cache = self.name, "cache hit");
                return Ok(Arc::clone(&entry.value));
            }
            state.generation
        };

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = Arc::new(load()?);

        let mut state = self.lock();
        if state.generation == generation {
            let now = Instant::now();
            state.entries.retain(|_, entry| entry.is_live(now));
            state.entries.insert(
                key.clone(),
                Entry {
                    value: Arc::clone(&value),
                    expires_at: now.checked_add(self.ttl),
                },
            );
        } else {
            debug!(cache = self.name, "load overlapped a flush, result not cached");
        }

        Ok(value)
    }

    /// Drop every entry and advance the flush generation.
    pub fn invalidate_all(&self) {
        let mut state = self.lock();
        let dropped = state.entries.len();
        state.entries.clear();
        state.generation = state.generation.wrapping_add(1);
        drop(state);

        debug!(cache = self.name, dropped, "cache invalidated");
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.lock().entries.len(),
        }
    }

    // A panic while holding the lock can only interrupt a whole-entry
    // insert or a clear, so the map is still consistent.
    fn lock(&self) -> MutexGuard<'_, CacheState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
