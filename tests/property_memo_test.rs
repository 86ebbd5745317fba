//! Tests for [`PropertyMemo`] — per-instance compute-once accessors.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use muninn::PropertyMemo;

struct Report {
    body: String,
    renders: AtomicUsize,
}

impl Report {
    fn new(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: body.to_string(),
            renders: AtomicUsize::new(0),
        })
    }
}

#[test]
fn side_effecting_computation_runs_once() {
    // Two accesses yield the same number and the counter ends at 1.
    let serial = PropertyMemo::new(|report: &Report| {
        Ok(report.renders.fetch_add(1, Ordering::SeqCst) + 1)
    });
    let report = Report::new("q3");

    assert_eq!(serial.get(&report).unwrap(), 1);
    assert_eq!(serial.get(&report).unwrap(), 1);
    assert_eq!(report.renders.load(Ordering::SeqCst), 1);
}

#[test]
fn value_follows_the_instance() {
    let summary = PropertyMemo::new(|report: &Report| {
        report.renders.fetch_add(1, Ordering::SeqCst);
        Ok(report.body.to_uppercase())
    });
    let a = Report::new("alpha");
    let b = Report::new("beta");

    assert_eq!(summary.get(&a).unwrap(), "ALPHA");
    assert_eq!(summary.get(&b).unwrap(), "BETA");
    assert_eq!(summary.get(&a).unwrap(), "ALPHA");
    assert_eq!(a.renders.load(Ordering::SeqCst), 1);
    assert_eq!(b.renders.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_string_value_is_cached_not_recomputed() {
    // "Falsy" values must be hits: presence lives in the slot, not in the
    // value.
    let summary = PropertyMemo::new(|report: &Report| {
        report.renders.fetch_add(1, Ordering::SeqCst);
        Ok(String::new())
    });
    let report = Report::new("");

    assert_eq!(summary.get(&report).unwrap(), "");
    assert_eq!(summary.get(&report).unwrap(), "");
    assert_eq!(report.renders.load(Ordering::SeqCst), 1);
}

#[test]
fn slot_is_released_when_instance_drops() {
    let summary = PropertyMemo::new(|report: &Report| Ok(report.body.clone()));

    let a = Report::new("ephemeral");
    summary.get(&a).unwrap();
    assert_eq!(summary.instance_count(), 1);
    drop(a);

    let b = Report::new("durable");
    summary.get(&b).unwrap();
    assert_eq!(summary.instance_count(), 1);
}

#[test]
fn concurrent_first_accesses_agree() {
    let value = Arc::new(AtomicUsize::new(0));
    let serial = {
        let value = Arc::clone(&value);
        Arc::new(PropertyMemo::new(move |_report: &Report| {
            Ok(value.fetch_add(1, Ordering::SeqCst))
        }))
    };
    let report = Report::new("shared");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let serial = Arc::clone(&serial);
            let report = Arc::clone(&report);
            std::thread::spawn(move || serial.get(&report).unwrap())
        })
        .collect();

    let results: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Duplicate computation is allowed under the race, but every caller
    // must observe the single stored value.
    let first = results[0];
    assert!(results.iter().all(|&r| r == first));
    assert_eq!(serial.get(&report).unwrap(), first);
}
