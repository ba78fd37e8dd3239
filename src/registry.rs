//! Per-collection write locks.
//!
//! Implement [`LockRegistry`] to bring your own concurrent map. Locks are
//! created lazily on first use and never evicted, so the registry grows with
//! the number of distinct collection names an engine has seen.

use std::collections::HashMap;
use std::sync::Arc;

/// Exclusive lock guarding writes and deletes within one collection.
pub type CollectionLock = Arc<parking_lot::Mutex<()>>;

/// Maps collection names to their [`CollectionLock`].
///
/// `get_or_create` must hand every caller asking for the same name the same
/// lock, and must not hold any registry-internal lock after it returns.
pub trait LockRegistry: Send + Sync {
    /// Return the lock for `collection`, creating it on first request.
    fn get_or_create(&self, collection: &str) -> CollectionLock;

    /// Number of collections that have a lock.
    fn len(&self) -> usize;

    /// `true` when no lock has been created yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---- Mutex<HashMap> ----------------------------------------------------------

// One registry-wide lock, held only for the lookup-or-insert.
impl LockRegistry for parking_lot::Mutex<HashMap<String, CollectionLock>> {
    fn get_or_create(&self, collection: &str) -> CollectionLock {
        let mut map = self.lock();
        if let Some(lock) = map.get(collection) {
            return Arc::clone(lock);
        }
        let lock = CollectionLock::default();
        map.insert(collection.to_owned(), Arc::clone(&lock));
        lock
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

// ---- DashMap (feature-gated) -------------------------------------------------

#[cfg(feature = "dashmap")]
impl LockRegistry for dashmap::DashMap<String, CollectionLock> {
    fn get_or_create(&self, collection: &str) -> CollectionLock {
        if let Some(lock) = self.get(collection) {
            return Arc::clone(lock.value());
        }
        // entry() takes the shard write lock, so racing creators agree.
        let entry = self.entry(collection.to_owned()).or_default();
        Arc::clone(entry.value())
    }

    fn len(&self) -> usize {
        dashmap::DashMap::len(self)
    }
}
