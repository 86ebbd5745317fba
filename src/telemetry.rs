//! Telemetry metric name constants.
//!
//! Centralised metric names for muninn operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `muninn_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `scope` — which wrapper recorded the event: "function", "method",
//!   "property", or "keyed"

/// Total memo lookups that returned a cached value.
///
/// Labels: `scope`.
pub const MEMO_HITS_TOTAL: &str = "muninn_memo_hits_total";

/// Total memo lookups that fell through to the computation.
///
/// Labels: `scope`.
pub const MEMO_MISSES_TOTAL: &str = "muninn_memo_misses_total";

/// Total external-adapter calls that failed.
///
/// Labels: `operation` ("get" | "set").
pub const ADAPTER_ERRORS_TOTAL: &str = "muninn_adapter_errors_total";
