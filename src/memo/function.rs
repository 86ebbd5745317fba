//! Plain-function memoization over a local table.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

use crate::error::Result;
use crate::telemetry;

use super::lock;

/// Memoizes a deterministic computation in an unbounded local table.
///
/// The argument tuple itself is the lookup key, compared by structural
/// equality — no hashing collisions are possible, unlike the
/// digest-keyed external path. Entries are write-once and live until the
/// wrapper is dropped; there is no eviction and no TTL.
///
/// Failures are never cached: if the computation errors, the error
/// propagates and the next call with the same tuple retries.
///
/// Concurrent first calls with the same unseen tuple may both run the
/// computation; the first insert wins and both callers observe its value.
///
/// ```rust
/// use muninn::Memo;
///
/// let double: Memo<(u64,), u64, _> = Memo::new(|args: &(u64,)| Ok(args.0 * 2));
/// assert_eq!(double.call((21,))?, 42);
/// assert_eq!(double.call((21,))?, 42); // served from the table
/// # Ok::<(), muninn::MuninnError>(())
/// ```
pub struct Memo<A, R, F> {
    table: Mutex<HashMap<A, R>>,
    compute: F,
}

impl<A, R, F> Memo<A, R, F>
where
    A: Hash + Eq,
    R: Clone,
    F: Fn(&A) -> Result<R>,
{
    /// Wrap a computation with an empty table.
    pub fn new(compute: F) -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
            compute,
        }
    }

    /// Return the cached result for `args`, computing and storing it on a
    /// miss.
    pub fn call(&self, args: A) -> Result<R> {
        if let Some(value) = lock(&self.table).get(&args) {
            metrics::counter!(telemetry::MEMO_HITS_TOTAL, "scope" => "function").increment(1);
            return Ok(value.clone());
        }
        metrics::counter!(telemetry::MEMO_MISSES_TOTAL, "scope" => "function").increment(1);

        // Computed outside the lock; a concurrent caller may duplicate the
        // work for the same tuple. Whichever insert lands first is the
        // entry's value for good.
        let value = (self.compute)(&args)?;
        let mut table = lock(&self.table);
        let stored = table.entry(args).or_insert(value);
        Ok(stored.clone())
    }

    /// Number of cached argument tuples.
    pub fn len(&self) -> usize {
        lock(&self.table).len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
