//! External-cache keyed memoization.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::adapter::CacheAdapter;
use crate::error::Result;
use crate::key::{KeyArgs, derive_key};
use crate::telemetry;

type KeyFn<A> = Box<dyn Fn(&A) -> Result<String> + Send + Sync>;

/// Memoizes a computation through a shared external cache.
///
/// Unlike the local-table wrappers, which key on structural equality, this
/// wrapper derives a string key — `memo_<name>_<digest>` via
/// [`crate::key::derive_key`], or whatever a caller-supplied
/// [`key_fn`](KeyedMemo::key_fn) returns — and delegates storage to an
/// injected [`CacheAdapter`]. That buys cross-process sharing and TTL at
/// the cost of resting correctness on the digest's collision resistance.
///
/// The adapter is an explicit constructor argument, never ambient state,
/// so the wrapper is testable against a stub. Adapter failures propagate
/// as [`AdapterUnavailable`](crate::MuninnError::AdapterUnavailable) —
/// there is no silent fallback to uncached computation. Arguments without
/// a canonical byte form fail key derivation before the adapter is ever
/// contacted.
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use muninn::{KeyedMemo, MemoryAdapter};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> muninn::Result<()> {
/// let adapter = Arc::new(MemoryAdapter::new());
/// let lookup = KeyedMemo::new("lookup", adapter, |args: &(String,)| {
///     let name = args.0.clone();
///     async move { Ok(name.len() as u64) }
/// })
/// .ttl(Duration::from_secs(600));
///
/// assert_eq!(lookup.call(("heimdallr".into(),)).await?, 9);
/// assert_eq!(lookup.call(("heimdallr".into(),)).await?, 9); // served by the adapter
/// # Ok(())
/// # }
/// ```
pub struct KeyedMemo<A, R, F> {
    adapter: Arc<dyn CacheAdapter>,
    compute: F,
    ttl: Duration,
    key_fn: KeyFn<A>,
    _result: PhantomData<fn() -> R>,
}

impl<A, R, F, Fut> KeyedMemo<A, R, F>
where
    R: Serialize + DeserializeOwned,
    F: Fn(&A) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    /// Wrap a computation with the default key deriver.
    ///
    /// `name` namespaces this computation's keys in the shared backend.
    /// The TTL starts at [`Duration::ZERO`] ("backend default"); set an
    /// explicit one with [`ttl`](KeyedMemo::ttl).
    pub fn new(
        name: impl Into<String>,
        adapter: Arc<dyn CacheAdapter>,
        compute: F,
    ) -> Self
    where
        A: KeyArgs,
    {
        let name = name.into();
        Self {
            adapter,
            compute,
            ttl: Duration::ZERO,
            key_fn: Box::new(move |args: &A| derive_key(&name, args)),
            _result: PhantomData,
        }
    }

    /// Set the time-to-live passed to the adapter on every store.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replace key derivation entirely.
    ///
    /// The function receives the argument tuple and must return the full
    /// cache key. Useful for hashing only a subset of the arguments or
    /// normalizing them first; it also lifts the requirement that the
    /// arguments implement [`KeyArgs`].
    pub fn key_fn(
        mut self,
        key_fn: impl Fn(&A) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        self.key_fn = Box::new(key_fn);
        self
    }

    /// Return the cached result for `args`, computing and storing it in
    /// the external cache on a miss.
    pub async fn call(&self, args: A) -> Result<R> {
        let key = (self.key_fn)(&args)?;

        match self.adapter.get(&key).await {
            Ok(Some(cached)) => {
                metrics::counter!(telemetry::MEMO_HITS_TOTAL, "scope" => "keyed").increment(1);
                debug!(key = %key, "shared cache hit");
                return Ok(serde_json::from_value(cached)?);
            }
            Ok(None) => {
                metrics::counter!(telemetry::MEMO_MISSES_TOTAL, "scope" => "keyed").increment(1);
                debug!(key = %key, "shared cache miss");
            }
            Err(e) => {
                metrics::counter!(telemetry::ADAPTER_ERRORS_TOTAL, "operation" => "get")
                    .increment(1);
                warn!(key = %key, error = %e, "cache adapter get failed");
                return Err(e);
            }
        }

        let value = (self.compute)(&args).await?;
        let json = serde_json::to_value(&value)?;
        if let Err(e) = self.adapter.set(&key, json, self.ttl).await {
            metrics::counter!(telemetry::ADAPTER_ERRORS_TOTAL, "operation" => "set").increment(1);
            warn!(key = %key, error = %e, "cache adapter set failed");
            return Err(e);
        }
        Ok(value)
    }
}
