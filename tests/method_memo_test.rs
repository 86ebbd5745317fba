//! Tests for [`MethodMemo`] — per-instance method memoization.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use muninn::{MethodMemo, Result};

struct Catalog {
    prefix: &'static str,
    lookups: AtomicUsize,
}

impl Catalog {
    fn new(prefix: &'static str) -> Arc<Self> {
        Arc::new(Self {
            prefix,
            lookups: AtomicUsize::new(0),
        })
    }
}

fn title_memo() -> MethodMemo<Catalog, (u32,), String, impl Fn(&Catalog, &(u32,)) -> Result<String>>
{
    MethodMemo::new(|catalog: &Catalog, args: &(u32,)| {
        catalog.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}-{}", catalog.prefix, args.0))
    })
}

#[test]
fn same_instance_same_args_hits() {
    let memo = title_memo();
    let a = Catalog::new("sku");

    assert_eq!(memo.call(&a, (7,)).unwrap(), "sku-7");
    assert_eq!(memo.call(&a, (7,)).unwrap(), "sku-7");
    assert_eq!(a.lookups.load(Ordering::SeqCst), 1);
}

#[test]
fn distinct_instances_never_share_state() {
    let memo = title_memo();
    let a = Catalog::new("a");
    let b = Catalog::new("b");

    // Identical arguments, different instances, different results.
    assert_eq!(memo.call(&a, (1,)).unwrap(), "a-1");
    assert_eq!(memo.call(&b, (1,)).unwrap(), "b-1");

    // b's hit is served from b's own table; a's entry is untouched.
    assert_eq!(memo.call(&b, (1,)).unwrap(), "b-1");
    assert_eq!(memo.call(&a, (1,)).unwrap(), "a-1");
    assert_eq!(a.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(b.lookups.load(Ordering::SeqCst), 1);
}

#[test]
fn clones_of_the_same_arc_share_a_table() {
    let memo = title_memo();
    let a = Catalog::new("sku");
    let a2 = Arc::clone(&a);

    assert_eq!(memo.call(&a, (1,)).unwrap(), "sku-1");
    assert_eq!(memo.call(&a2, (1,)).unwrap(), "sku-1");
    assert_eq!(a.lookups.load(Ordering::SeqCst), 1);
}

#[test]
fn table_dies_with_its_instance() {
    let memo = title_memo();

    let a = Catalog::new("old");
    memo.call(&a, (1,)).unwrap();
    drop(a);

    // A new instance may land on the recycled address; it must start from
    // an empty table either way.
    let b = Catalog::new("new");
    assert_eq!(memo.call(&b, (1,)).unwrap(), "new-1");
    assert_eq!(b.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(memo.instance_count(), 1);
}

#[test]
fn concurrent_callers_on_one_instance() {
    let memo = Arc::new(title_memo());
    let a = Catalog::new("sku");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let memo = Arc::clone(&memo);
            let a = Arc::clone(&a);
            std::thread::spawn(move || memo.call(&a, (42,)).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "sku-42");
    }
}
