use sarja_mem::{ArrayError, CapacityPolicy, DynArray, GlobalAlloc};
use sarja_test_utils::CountingAlloc;

struct StepSixteen {}

impl CapacityPolicy for StepSixteen {

    fn grow(current: usize) -> Option<usize> {
        current.checked_add(16)
    }
}

struct Frozen {}

impl CapacityPolicy for Frozen {

    fn grow(_current: usize) -> Option<usize> {
        None
    }
}

#[test]
fn appends_follow_doubling() {
    let mut arr = DynArray::new();
    let mut capacities = vec![];
    for i in 0..9u32 {
        arr.push_back(&i).unwrap();
        capacities.push(arr.capacity());
    }
    assert_eq!(capacities, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
}

#[test]
fn with_capacity_allocates_exactly() {
    let arr: DynArray<u64> = DynArray::with_capacity(5).unwrap();
    assert_eq!((arr.len(), arr.capacity()), (0, 5));
    assert!(!arr.data().is_null());

    let empty: DynArray<u64> = DynArray::with_capacity(0).unwrap();
    assert!(empty.data().is_null());
}

#[test]
fn reserve_then_shrink() {
    let mut arr = DynArray::from_slice(&[1, 2, 3]).unwrap();
    arr.reserve(3).unwrap();
    assert_eq!(arr.capacity(), 3);
    arr.reserve(9).unwrap();
    assert_eq!(arr.capacity(), 9);
    arr.push_back(&4).unwrap();
    assert_eq!(arr.capacity(), 9);
    arr.shrink_to_fit().unwrap();
    assert_eq!(arr.capacity(), 4);
    assert_eq!(arr, [1, 2, 3, 4]);
}

#[test]
fn custom_policy_drives_growth() {
    let mut arr = DynArray::<u8, GlobalAlloc, StepSixteen>::new_in(GlobalAlloc);
    for i in 0..17 {
        arr.push(i).unwrap();
    }
    assert_eq!(arr.capacity(), 32);
}

#[test]
fn policy_without_next_capacity_fails_growth() {
    let mut arr = DynArray::<u8, GlobalAlloc, Frozen>::new_in(GlobalAlloc);
    let err = arr.push(1).unwrap_err();
    assert!(matches!(err, ArrayError::AllocFailed { new_capacity: usize::MAX }));
    assert_eq!((arr.len(), arr.capacity()), (0, 0));

    arr.reserve(2).unwrap();
    arr.push(1).unwrap();
    arr.push(2).unwrap();
    assert!(arr.push(3).is_err());
    assert_eq!(arr, [1, 2]);
}

#[test]
fn unrepresentable_capacity_is_alloc_failure() {
    let mut arr: DynArray<u64> = DynArray::new();
    let err = arr.reserve(usize::MAX).unwrap_err();
    assert!(matches!(err, ArrayError::AllocFailed { new_capacity: usize::MAX }));
    assert_eq!(arr.capacity(), 0);
}

#[test]
fn every_block_is_returned() {
    let alloc = CountingAlloc::new();
    {
        let mut arr = DynArray::<u32, _>::new_in(alloc.clone());
        for i in 0..100 {
            arr.push(i).unwrap();
        }
        arr.shrink_to_fit().unwrap();
        let copy = arr.try_clone().unwrap();
        assert_eq!(copy.capacity(), 100);
        assert!(alloc.live_bytes() >= 2 * 100 * 4);
    }
    assert_eq!(alloc.live_bytes(), 0);
    assert_eq!(alloc.allocations(), alloc.frees());
}

#[test]
fn clear_keeps_the_block() {
    let alloc = CountingAlloc::new();
    let mut arr = DynArray::<u32, _>::with_capacity_in(8, alloc.clone()).unwrap();
    arr.extend_from_slice(&[1, 2, 3]).unwrap();
    arr.clear();
    assert_eq!((arr.len(), arr.capacity()), (0, 8));
    assert_eq!(alloc.live_bytes(), 32);
    arr.shrink_to_fit().unwrap();
    assert_eq!(alloc.live_bytes(), 0);
}
