//! Per-instance method memoization.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::{Arc, Mutex, Weak};

use crate::error::Result;
use crate::telemetry;

use super::lock;

/// One instance's private memo table, guarded by a liveness handle.
struct InstanceTable<T, A, R> {
    instance: Weak<T>,
    entries: HashMap<A, R>,
}

/// Memoizes a method per instance.
///
/// Each instance gets its own private table the first time the memoized
/// method is called on it; two instances calling with identical arguments
/// never share a cached result. Within one instance's table the semantics
/// match [`Memo`](crate::Memo): structural-equality keys, write-once
/// entries, failures never cached.
///
/// Tables live in an explicit side-table keyed on the instance's `Arc`
/// pointer identity, not in fields injected into the instance. A `Weak`
/// handle per table detects dropped instances: their tables are purged on
/// the next call through the wrapper (or eagerly via [`forget`]), and the
/// handle also stops a recycled allocation address from inheriting a dead
/// instance's entries.
///
/// ```rust
/// use std::sync::Arc;
/// use muninn::MethodMemo;
///
/// struct Sensor { offset: i64 }
///
/// let adjusted = MethodMemo::new(|sensor: &Sensor, args: &(i64,)| Ok(sensor.offset + args.0));
///
/// let a = Arc::new(Sensor { offset: 100 });
/// let b = Arc::new(Sensor { offset: 200 });
/// assert_eq!(adjusted.call(&a, (5,))?, 105);
/// assert_eq!(adjusted.call(&b, (5,))?, 205); // b's table, not a's
/// # Ok::<(), muninn::MuninnError>(())
/// ```
///
/// [`forget`]: MethodMemo::forget
pub struct MethodMemo<T, A, R, F> {
    tables: Mutex<HashMap<usize, InstanceTable<T, A, R>>>,
    method: F,
}

impl<T, A, R, F> MethodMemo<T, A, R, F>
where
    A: Hash + Eq,
    R: Clone,
    F: Fn(&T, &A) -> Result<R>,
{
    /// Wrap a method with an empty side-table.
    pub fn new(method: F) -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            method,
        }
    }

    /// Return `instance`'s cached result for `args`, computing and storing
    /// it on a miss.
    pub fn call(&self, instance: &Arc<T>, args: A) -> Result<R> {
        let id = Arc::as_ptr(instance) as usize;
        {
            let mut tables = lock(&self.tables);
            // Dropped instances leave dead tables behind; purging them here
            // also frees their addresses for honest reuse. Any table that
            // survives the purge and shares our address is ours.
            tables.retain(|_, table| table.instance.strong_count() > 0);
            if let Some(table) = tables.get(&id) {
                if let Some(value) = table.entries.get(&args) {
                    metrics::counter!(telemetry::MEMO_HITS_TOTAL, "scope" => "method")
                        .increment(1);
                    return Ok(value.clone());
                }
            }
        }
        metrics::counter!(telemetry::MEMO_MISSES_TOTAL, "scope" => "method").increment(1);

        let value = (self.method)(instance.as_ref(), &args)?;
        let mut tables = lock(&self.tables);
        let table = match tables.entry(id) {
            Entry::Occupied(occupied) => {
                let table = occupied.into_mut();
                if table.instance.strong_count() == 0 {
                    // The previous resident of this address died since the
                    // purge above; its entries must not leak to us.
                    table.instance = Arc::downgrade(instance);
                    table.entries.clear();
                }
                table
            }
            Entry::Vacant(vacant) => vacant.insert(InstanceTable {
                instance: Arc::downgrade(instance),
                entries: HashMap::new(),
            }),
        };
        let stored = table.entries.entry(args).or_insert(value);
        Ok(stored.clone())
    }

    /// Drop `instance`'s table immediately instead of waiting for the
    /// opportunistic purge.
    pub fn forget(&self, instance: &Arc<T>) {
        lock(&self.tables).remove(&(Arc::as_ptr(instance) as usize));
    }

    /// Number of instances currently holding a table.
    pub fn instance_count(&self) -> usize {
        lock(&self.tables).len()
    }
}
