//! Per-key async mutual exclusion.
//!
//! Tag provisioning serializes on `(owner, name)` and orphan collection on
//! `tag_id`, so two requests racing on the same key run their
//! check-then-act sequences one after the other. Unrelated keys never wait on
//! each other. Slots are held weakly and pruned once no task references them.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard returned by [`KeyedLocks::lock`]; the key is released on drop.
#[derive(Debug)]
pub struct KeyGuard {
    _guard: OwnedMutexGuard<()>,
}

/// Registry of async mutexes addressed by key.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    slots: Mutex<HashMap<K, Weak<AsyncMutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until `key` is free and hold it until the guard drops.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::KeyedLocks;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let locks = KeyedLocks::new();
    /// let guard = locks.lock("infra".to_owned()).await;
    /// assert_eq!(locks.active_keys(), 1);
    /// drop(guard);
    /// assert_eq!(locks.active_keys(), 0);
    /// # });
    /// ```
    pub async fn lock(&self, key: K) -> KeyGuard {
        let slot = self.slot(key);
        KeyGuard {
            _guard: slot.lock_owned().await,
        }
    }

    /// Number of keys currently held or awaited.
    pub fn active_keys(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.strong_count() > 0).count()
    }

    fn slot(&self, key: K) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.retain(|_, slot| slot.strong_count() > 0);
        if let Some(existing) = slots.get(&key).and_then(Weak::upgrade) {
            return existing;
        }
        let fresh = Arc::new(AsyncMutex::new(()));
        slots.insert(key, Arc::downgrade(&fresh));
        fresh
    }
}
