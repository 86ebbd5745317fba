//! External cache adapter contract.
//!
//! The keyed memo ([`KeyedMemo`](crate::KeyedMemo)) never talks to a backend
//! directly — it goes through [`CacheAdapter`], a minimal get/set capability
//! injected at construction time. The backend's wire protocol, eviction
//! policy, and cross-process guarantees are entirely its own business.
//!
//! Two implementations ship here:
//!
//! - [`memory::MemoryAdapter`] — in-process, moka-backed, with per-entry
//!   TTL. Good for tests, demos, and single-process deployments.
//! - Anything else (redis, memcached, ...) — implement the trait in the
//!   consuming crate; the memo layer only needs these two methods.
//!
//! # Absence convention
//!
//! `get` returning `None` is deliberately ambiguous: it means "no entry",
//! "expired", or "never computed" — the memo layer treats all three as a
//! miss and recomputes. The flip side is a documented limitation: if a
//! backend represents absence with some in-band value (say, an empty
//! string), caching a legitimate value equal to that marker breaks the
//! distinction. That is the backend's convention to fix, not this layer's
//! to paper over.

pub mod memory;

pub use memory::{MemoryAdapter, MemoryAdapterConfig};

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Minimal capability interface for a shared cache backend.
///
/// Values cross the boundary as [`serde_json::Value`] — self-describing and
/// backend-agnostic. How a backend stores them (JSON text, binary, whatever)
/// is its own concern.
///
/// There is deliberately no delete/invalidate operation: the memo layer
/// never removes entries, it only observes absence.
#[async_trait]
pub trait CacheAdapter: Send + Sync {
    /// Look up a cached value.
    ///
    /// Returns `Ok(None)` on a miss (no entry, or entry expired). Fails
    /// with [`MuninnError::AdapterUnavailable`](crate::MuninnError::AdapterUnavailable)
    /// when the backend is unreachable.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store a value under `key`.
    ///
    /// `ttl` of [`Duration::ZERO`] means "cache per the backend's default
    /// policy"; anything else is an explicit time-to-live after which the
    /// backend may drop the entry.
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;
}
