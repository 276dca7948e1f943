use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use super::domain::{DriveId, StudentId};

/// Lazily created mutex per key. Closures run while the key's mutex is held.
pub struct KeyedLocks<K> {
    slots: DashMap<K, Arc<Mutex<()>>>,
}

impl<K> Default for KeyedLocks<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    pub fn with_lock<T>(&self, key: &K, f: impl FnOnce() -> T) -> T {
        // Clone the slot out so the shard guard is released before blocking.
        let slot = self.slots.entry(key.clone()).or_default().clone();
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}

/// Serialization points for ranking recomputation and offer acceptance.
///
/// Student locks are always taken before drive locks.
#[derive(Default)]
pub struct PlacementLocks {
    students: KeyedLocks<StudentId>,
    drives: KeyedLocks<DriveId>,
}

impl PlacementLocks {
    pub fn with_student_lock<T>(&self, id: &StudentId, f: impl FnOnce() -> T) -> T {
        self.students.with_lock(id, f)
    }

    pub fn with_drive_lock<T>(&self, id: &DriveId, f: impl FnOnce() -> T) -> T {
        self.drives.with_lock(id, f)
    }
}
