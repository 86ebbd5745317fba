//! Memoization wrappers.
//!
//! Four call shapes over two storage strategies:
//!
//! - [`function::Memo`] — plain function memo. One unbounded local table per
//!   wrapper, keyed on structural equality of the argument tuple.
//!
//! - [`method::MethodMemo`] — per-instance method memo. Same table
//!   semantics, but each instance gets its own private table; distinct
//!   instances never share cached results.
//!
//! - [`property::PropertyMemo`] — per-instance property memo. The
//!   zero-argument specialization of the method memo: one value per live
//!   instance, computed on first access.
//!
//! - [`keyed::KeyedMemo`] — external-cache memo. Keys derived through
//!   [`crate::key`] (or a caller-supplied key function), storage delegated
//!   to an injected [`CacheAdapter`](crate::CacheAdapter) with TTL.
//!
//! Local-table wrappers key on equality, so collisions are impossible and
//! arbitrary `Hash + Eq` argument tuples work. The keyed wrapper trades
//! that for cross-process sharing: its correctness rests on the digest's
//! collision resistance, and its arguments must have canonical byte forms.
//!
//! All wrappers are passive pass-throughs: they run on the caller's
//! thread/task, never block beyond the wrapped computation (or adapter
//! call), and propagate every failure without caching it.

pub mod function;
pub mod keyed;
pub mod method;
pub mod property;

pub use function::Memo;
pub use keyed::KeyedMemo;
pub use method::MethodMemo;
pub use property::PropertyMemo;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a memo table, shrugging off poisoning.
///
/// Tables are insert-only and never mutated mid-panic, so a poisoned lock
/// still guards a consistent map.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
