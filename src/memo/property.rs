//! Per-instance property memoization.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, Weak};

use crate::error::Result;
use crate::telemetry;

use super::lock;

/// One instance's computed value, guarded by a liveness handle.
struct Slot<T, R> {
    instance: Weak<T>,
    value: R,
}

/// Memoizes a zero-argument accessor per instance.
///
/// The zero-argument specialization of [`MethodMemo`](crate::MethodMemo):
/// the computation sees only the instance, and the wrapper exposes a
/// read-only [`get`](PropertyMemo::get) rather than a call taking
/// arguments. The value is computed once per live instance — side effects
/// in the computation run exactly once — and returned from the slot on
/// every later access.
///
/// Presence is the slot itself, never a sentinel value: a cached `None`,
/// empty string, or zero is still a hit and is never recomputed.
///
/// ```rust
/// use std::sync::Arc;
/// use muninn::PropertyMemo;
///
/// struct Doc { body: String }
///
/// let word_count = PropertyMemo::new(|doc: &Doc| Ok(doc.body.split_whitespace().count()));
///
/// let doc = Arc::new(Doc { body: "fickle squirrel".into() });
/// assert_eq!(word_count.get(&doc)?, 2);
/// assert_eq!(word_count.get(&doc)?, 2); // served from the slot
/// # Ok::<(), muninn::MuninnError>(())
/// ```
pub struct PropertyMemo<T, R, F> {
    slots: Mutex<HashMap<usize, Slot<T, R>>>,
    compute: F,
}

impl<T, R, F> PropertyMemo<T, R, F>
where
    R: Clone,
    F: Fn(&T) -> Result<R>,
{
    /// Wrap an accessor with an empty side-table.
    pub fn new(compute: F) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            compute,
        }
    }

    /// Return `instance`'s value, computing and storing it on first access.
    pub fn get(&self, instance: &Arc<T>) -> Result<R> {
        let id = Arc::as_ptr(instance) as usize;
        {
            let mut slots = lock(&self.slots);
            // Same purge discipline as MethodMemo: dead slots go, and a
            // surviving slot at our address is necessarily ours.
            slots.retain(|_, slot| slot.instance.strong_count() > 0);
            if let Some(slot) = slots.get(&id) {
                metrics::counter!(telemetry::MEMO_HITS_TOTAL, "scope" => "property")
                    .increment(1);
                return Ok(slot.value.clone());
            }
        }
        metrics::counter!(telemetry::MEMO_MISSES_TOTAL, "scope" => "property").increment(1);

        let value = (self.compute)(instance.as_ref())?;
        let mut slots = lock(&self.slots);
        match slots.entry(id) {
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                if slot.instance.strong_count() == 0 {
                    // A dead previous resident of this address; replace it.
                    *slot = Slot {
                        instance: Arc::downgrade(instance),
                        value,
                    };
                }
                // Otherwise a racing first access already stored a value;
                // it wins, ours is discarded.
                Ok(slot.value.clone())
            }
            Entry::Vacant(vacant) => {
                let slot = vacant.insert(Slot {
                    instance: Arc::downgrade(instance),
                    value,
                });
                Ok(slot.value.clone())
            }
        }
    }

    /// Drop `instance`'s slot immediately instead of waiting for the
    /// opportunistic purge.
    pub fn forget(&self, instance: &Arc<T>) {
        lock(&self.slots).remove(&(Arc::as_ptr(instance) as usize));
    }

    /// Number of instances currently holding a value.
    pub fn instance_count(&self) -> usize {
        lock(&self.slots).len()
    }
}
