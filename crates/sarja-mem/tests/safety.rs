use sarja_mem::{ArrayError, DynArray};
use sarja_test_utils::{CountingAlloc, Ledger, Probe};

use std::rc::Rc;

fn filled(ledger: &Rc<Ledger>, alloc: &CountingAlloc, values: impl IntoIterator<Item = i32>) -> DynArray<Probe, CountingAlloc> {
    let mut arr = DynArray::new_in(alloc.clone());
    for probe in ledger.probes(values) {
        arr.push(probe).unwrap();
    }
    arr
}

fn sorted_values(arr: &DynArray<Probe, CountingAlloc>) -> Vec<i32> {
    let mut values: Vec<i32> = arr.iter().map(|p| p.value).collect();
    values.sort();
    values
}

#[test]
fn failed_copy_leaks_nothing() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    for n in 0..4 {
        let arr = filled(&ledger, &alloc, 0..n + 5);
        let bytes = alloc.live_bytes();
        ledger.fail_copy_after(n as usize);
        let err = arr.try_clone().unwrap_err();
        assert!(matches!(err, ArrayError::Element(_)));
        assert_eq!(ledger.live(), n as usize + 5);
        assert_eq!(alloc.live_bytes(), bytes);
    }
    assert_eq!(ledger.live(), 0);
    assert_eq!(alloc.live_bytes(), 0);
}

#[test]
fn reserve_is_strong_under_copy_failure() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr = filled(&ledger, &alloc, [1, 2, 3, 4]);
    let data = arr.data();
    ledger.fail_copy_after(2);
    let err = arr.reserve(10).unwrap_err();
    assert_eq!(err.element_error().map(|e| e.to_string()).as_deref(), Some("copy of probe 3 refused"));
    assert_eq!(arr.capacity(), 4);
    assert_eq!(arr.data(), data);
    assert_eq!(arr, [1, 2, 3, 4]);
    assert_eq!(ledger.live(), 4);
}

#[test]
fn reserve_is_strong_under_alloc_failure() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr = filled(&ledger, &alloc, [1, 2, 3]);
    let copies = ledger.copies();
    alloc.fail_after(0);
    let err = arr.reserve(100).unwrap_err();
    assert!(matches!(err, ArrayError::AllocFailed { new_capacity: 100 }));
    assert_eq!(arr.capacity(), 4);
    assert_eq!(arr, [1, 2, 3]);
    assert_eq!(ledger.copies(), copies);
}

#[test]
fn shrink_is_strong() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr = filled(&ledger, &alloc, [1, 2, 3]);
    ledger.fail_copy_after(0);
    assert!(arr.shrink_to_fit().is_err());
    assert_eq!((arr.len(), arr.capacity()), (3, 4));
    assert_eq!(arr, [1, 2, 3]);
}

#[test]
fn push_back_is_strong_when_growth_fails() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr = filled(&ledger, &alloc, [1, 2, 3, 4]);
    let value = ledger.probe(5);
    alloc.fail_after(0);
    let err = arr.push_back(&value).unwrap_err();
    assert!(matches!(err, ArrayError::AllocFailed { new_capacity: 8 }));
    assert_eq!((arr.len(), arr.capacity()), (4, 4));
    assert_eq!(ledger.live(), 5);

    alloc.unlimited();
    arr.push_back(&value).unwrap();
    assert_eq!(arr, [1, 2, 3, 4, 5]);
}

#[test]
fn push_back_is_strong_when_copy_fails() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr = filled(&ledger, &alloc, [1, 2]);
    let value = ledger.probe(3);
    // one copy of the value, then one per element moved into the grown block
    for after in 0..3 {
        ledger.fail_copy_after(after);
        assert!(arr.push_back(&value).is_err());
        assert_eq!((arr.len(), arr.capacity()), (2, 2));
        assert_eq!(arr, [1, 2]);
        assert_eq!(ledger.live(), 3);
    }
    arr.push_back(&value).unwrap();
    assert_eq!(arr, [1, 2, 3]);
}

#[test]
fn push_back_in_place_is_strong_when_copy_fails() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr: DynArray<Probe, CountingAlloc> = DynArray::with_capacity_in(4, alloc.clone()).unwrap();
    arr.push(ledger.probe(1)).unwrap();
    let data = arr.data();
    let value = ledger.probe(2);
    ledger.fail_copy_after(0);
    assert!(arr.push_back(&value).is_err());
    assert_eq!((arr.len(), arr.capacity()), (1, 4));
    assert_eq!(arr.data(), data);
    assert_eq!(arr, [1]);
    assert_eq!(ledger.live(), 2);

    arr.push_back(&value).unwrap();
    assert_eq!(arr, [1, 2]);
}

#[test]
fn insert_append_is_strong_under_alloc_failure() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr = filled(&ledger, &alloc, [1, 2, 3, 4]);
    let value = ledger.probe(9);
    alloc.fail_after(0);
    let err = arr.insert(1, &value).unwrap_err();
    assert!(matches!(err, ArrayError::AllocFailed { new_capacity: 8 }));
    assert_eq!((arr.len(), arr.capacity()), (4, 4));
    assert_eq!(arr, [1, 2, 3, 4]);
    assert_eq!(ledger.exchanges(), 0);
    assert_eq!(ledger.live(), 5);
}

#[test]
fn insert_append_is_strong_under_copy_failure() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr = filled(&ledger, &alloc, [1, 2, 3, 4]);
    let value = ledger.probe(9);
    ledger.fail_copy_after(0);
    let err = arr.insert(1, &value).unwrap_err();
    assert_eq!(err.element_error().map(|e| e.to_string()).as_deref(), Some("copy of probe 9 refused"));
    assert_eq!((arr.len(), arr.capacity()), (4, 4));
    assert_eq!(arr, [1, 2, 3, 4]);
    assert_eq!(ledger.exchanges(), 0);
    assert_eq!(ledger.live(), 5);
}

#[test]
fn copy_assign_failure_keeps_target() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let source = filled(&ledger, &alloc, [1, 2, 3]);
    let mut target = filled(&ledger, &alloc, [7]);
    ledger.fail_copy_after(1);
    assert!(target.try_clone_from(&source).is_err());
    assert_eq!(target, [7]);
    assert_eq!(ledger.live(), 4);
}

#[test]
fn extend_rolls_back_partial_copies() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr = filled(&ledger, &alloc, [1]);
    let more = ledger.probes([2, 3, 4]);
    ledger.fail_copy_after(2);
    assert!(arr.extend_from_slice(&more).is_err());
    assert_eq!(arr, [1]);
    assert_eq!(ledger.live(), 4);
    arr.extend_from_slice(&more).unwrap();
    assert_eq!(arr, [1, 2, 3, 4]);
}

#[test]
fn insert_is_weak_under_exchange_failure() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr = filled(&ledger, &alloc, [1, 2, 3, 4, 5]);
    let value = ledger.probe(9);
    ledger.fail_exchange_after(1);
    assert!(arr.insert(0, &value).is_err());
    assert_eq!(arr.len(), 6);
    assert_eq!(sorted_values(&arr), [1, 2, 3, 4, 5, 9]);
    assert_eq!(ledger.live(), 7);
}

#[test]
fn erase_is_weak_under_exchange_failure() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    let mut arr = filled(&ledger, &alloc, [1, 2, 3, 4, 5]);
    ledger.fail_exchange_after(2);
    assert!(arr.erase(0).is_err());
    assert_eq!(arr.len(), 5);
    assert_eq!(sorted_values(&arr), [1, 2, 3, 4, 5]);

    ledger.fail_exchange_after(0);
    assert!(arr.erase_range(0..2).is_err());
    assert_eq!(arr.len(), 5);
    assert_eq!(ledger.live(), 5);
}

#[test]
fn nothing_outlives_the_array() {
    let ledger = Ledger::new();
    let alloc = CountingAlloc::new();
    {
        let mut arr = filled(&ledger, &alloc, 0..10);
        arr.erase_range(2..5).unwrap();
        arr.truncate(4);
        let copy = arr.try_clone().unwrap();
        let _ = copy.into_iter().take(2).count();
    }
    assert_eq!(ledger.live(), 0);
    assert_eq!(alloc.live_bytes(), 0);
}
