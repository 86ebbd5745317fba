//! Muninn - in-process memoization with pluggable shared-cache backends
//!
//! This crate provides wrappers that cache the result of a deterministic
//! computation keyed by its inputs, so repeated calls with equal arguments
//! skip recomputation. Four call shapes are covered:
//!
//! - [`Memo`] — plain function memo over an unbounded local table.
//! - [`MethodMemo`] — per-instance method memo; instances never share
//!   cached results.
//! - [`PropertyMemo`] — per-instance, zero-argument, compute-once accessor.
//! - [`KeyedMemo`] — memo over a shared external cache behind the
//!   [`CacheAdapter`] trait, with stable cross-process keys and TTL.
//!
//! Local tables key on structural equality of the argument tuple, so no
//! collision is possible. The external path derives `memo_<name>_<digest>`
//! keys from a SHA-256 digest of the arguments' canonical byte forms (see
//! [`key`]) and is only as correct as that digest is collision-free.
//!
//! # Local Memoization Example
//!
//! ```rust
//! use muninn::Memo;
//!
//! let fib: Memo<(u64,), u64, _> = Memo::new(|args: &(u64,)| {
//!     fn fib(n: u64) -> u64 {
//!         if n < 2 { n } else { fib(n - 1) + fib(n - 2) }
//!     }
//!     Ok(fib(args.0))
//! });
//!
//! assert_eq!(fib.call((20,))?, 6_765);
//! assert_eq!(fib.call((20,))?, 6_765); // no recomputation
//! # Ok::<(), muninn::MuninnError>(())
//! ```
//!
//! # Shared Cache Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use muninn::{KeyedMemo, MemoryAdapter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> muninn::Result<()> {
//!     let adapter = Arc::new(MemoryAdapter::new());
//!
//!     let lookup = KeyedMemo::new("lookup", adapter, |args: &(String, u32)| {
//!         let (region, id) = (args.0.clone(), args.1);
//!         async move { Ok(format!("{region}/{id}")) }
//!     })
//!     .ttl(Duration::from_secs(600));
//!
//!     let hit = lookup.call(("eu-1".into(), 7)).await?;
//!     assert_eq!(hit, "eu-1/7");
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod error;
pub mod key;
pub mod memo;
pub mod telemetry;

// Re-export main types at crate root
pub use adapter::{CacheAdapter, MemoryAdapter, MemoryAdapterConfig};
pub use error::{MuninnError, Result};
pub use key::{CanonicalKey, KeyArgs, derive_key, digest};
pub use memo::{KeyedMemo, Memo, MethodMemo, PropertyMemo};
