//! # IDs
//! Layers need an identity that is distinct from every sibling, independent of where they are stored.
//! This is provided by `SketchID<T>`, a process-unique ID namespaced by the type `T`.
//!
//! Use `SketchID::<YourNamespaceTy>::default()` to allocate a fresh one. Order of IDs is not guaranteed.

use std::any::TypeId;
use std::collections::BTreeMap;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

// Next free value for each namespace. Namespaces are inserted rarely, counters are bumped often,
// so the map sits behind a RwLock and each counter is its own atomic.
static ID_SERVER: parking_lot::RwLock<BTreeMap<TypeId, AtomicU64>> =
    parking_lot::const_rwlock(BTreeMap::new());

/// Fetch-and-increment the counter for `T`. Returns the value *before* incrementing, starting at 1.
fn next_raw<T: std::any::Any>() -> u64 {
    let ty = TypeId::of::<T>();
    let read = ID_SERVER.upgradable_read();
    if let Some(counter) = read.get(&ty) {
        return counter.fetch_add(1, Ordering::Relaxed);
    }
    // First ID of this namespace. Another thread may have raced us between the check and the upgrade,
    // so go through the entry API rather than inserting blindly.
    let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
    write
        .entry(ty)
        .or_insert_with(|| AtomicU64::new(1))
        .fetch_add(1, Ordering::Relaxed)
}

/// ID that is guaranteed unique within this execution of the program.
/// IDs with different namespaces may share a value but are distinct types and never compare equal.
pub struct SketchID<T: std::any::Any> {
    id: NonZeroU64,
    _phantom: std::marker::PhantomData<T>,
}
impl<T: std::any::Any> SketchID<T> {
    /// Get the raw numeric value of this ID.
    /// IDs from differing namespaces may share the same numeric ID!
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
}
impl<T: std::any::Any> Default for SketchID<T> {
    fn default() -> Self {
        let raw = next_raw::<T>();
        // Zero is only reachable by wrapping around after u64::MAX allocations.
        let Some(id) = NonZeroU64::new(raw) else {
            #[cfg(not(test))]
            {
                log::error!("{} ID overflow! Aborting!", std::any::type_name::<T>());
                log::logger().flush();
                std::process::abort();
            }
            #[cfg(test)]
            {
                panic!("{} ID overflow! Aborting!", std::any::type_name::<T>())
            }
        };
        Self {
            id,
            _phantom: std::marker::PhantomData,
        }
    }
}
impl<T: std::any::Any> Clone for SketchID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for SketchID<T> {}
impl<T: std::any::Any> PartialEq for SketchID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for SketchID<T> {}
impl<T: std::any::Any> std::hash::Hash for SketchID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// Safety - only a u64 is stored. Without these, a !Send/!Sync namespace type would leak
// its restrictions onto the ID even though no T is ever held.
unsafe impl<T: std::any::Any> Send for SketchID<T> {}
unsafe impl<T: std::any::Any> Sync for SketchID<T> {}

impl<T: std::any::Any> std::fmt::Display for SketchID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rsplit always yields at least one element.
        let name = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or_default();
        write!(f, "{name}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for SketchID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}
