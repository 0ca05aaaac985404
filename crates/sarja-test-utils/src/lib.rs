//! Test utilities for sarja development.
//!
//! [`Probe`] is an element whose copies and exchanges are counted and can be made to
//! fail on demand. [`CountingAlloc`] forwards to the global allocator while keeping
//! tallies and an optional budget of successful allocations.

#![allow(missing_docs)]

use core::{
    cell::Cell,
    fmt::{self, Debug},
    mem,
    ptr::NonNull,
};

use std::rc::Rc;

use sarja_error::Error;
use sarja_mem::{Allocator, Element, ElementError, GLOBAL_ALLOC};

/// One-shot failure trigger: the first `after` calls pass, the next one fails and
/// disarms the trigger.
#[derive(Default)]
struct Trigger {
    remaining: Cell<Option<usize>>,
}

impl Trigger {

    fn arm(&self, after: usize) {
        self.remaining.set(Some(after));
    }

    fn disarm(&self) {
        self.remaining.set(None);
    }

    fn fire(&self) -> bool {
        match self.remaining.get() {
            None => false,
            Some(0) => {
                self.remaining.set(None);
                true
            },
            Some(n) => {
                self.remaining.set(Some(n - 1));
                false
            },
        }
    }
}

/// Shared bookkeeping for every [`Probe`] created from it.
#[derive(Default)]
pub struct Ledger {
    live: Cell<usize>,
    copies: Cell<usize>,
    exchanges: Cell<usize>,
    copy_trigger: Trigger,
    exchange_trigger: Trigger,
}

impl Ledger {

    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn probe(self: &Rc<Self>, value: i32) -> Probe {
        self.live.set(self.live.get() + 1);
        Probe {
            value,
            ledger: self.clone(),
        }
    }

    pub fn probes(self: &Rc<Self>, values: impl IntoIterator<Item = i32>) -> Vec<Probe> {
        values.into_iter().map(|value| self.probe(value)).collect()
    }

    /// Probes currently alive.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Successful copies so far.
    pub fn copies(&self) -> usize {
        self.copies.get()
    }

    /// Successful exchanges so far.
    pub fn exchanges(&self) -> usize {
        self.exchanges.get()
    }

    /// Lets `after` more copies succeed, then fails the next one.
    pub fn fail_copy_after(&self, after: usize) {
        self.copy_trigger.arm(after);
    }

    /// Lets `after` more exchanges succeed, then fails the next one.
    pub fn fail_exchange_after(&self, after: usize) {
        self.exchange_trigger.arm(after);
    }

    pub fn disarm(&self) {
        self.copy_trigger.disarm();
        self.exchange_trigger.disarm();
    }
}

/// Counted element carrying an `i32`.
pub struct Probe {
    pub value: i32,
    ledger: Rc<Ledger>,
}

impl Element for Probe {

    fn try_clone(&self) -> Result<Self, ElementError> {
        if self.ledger.copy_trigger.fire() {
            return Err(Error::just_context(format!("copy of probe {} refused", self.value)))
        }
        self.ledger.copies.set(self.ledger.copies.get() + 1);
        Ok(self.ledger.probe(self.value))
    }

    fn try_exchange(&mut self, other: &mut Self) -> Result<(), ElementError> {
        if self.ledger.exchange_trigger.fire() {
            return Err(Error::just_context(format!(
                "exchange of probes {} and {} refused", self.value, other.value,
            )))
        }
        self.ledger.exchanges.set(self.ledger.exchanges.get() + 1);
        mem::swap(self, other);
        Ok(())
    }
}

impl Drop for Probe {

    fn drop(&mut self) {
        self.ledger.live.set(self.ledger.live.get() - 1);
    }
}

impl PartialEq for Probe {

    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<i32> for Probe {

    fn eq(&self, other: &i32) -> bool {
        self.value == *other
    }
}

impl Debug for Probe {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Default)]
pub struct AllocStats {
    allocations: Cell<usize>,
    frees: Cell<usize>,
    live_bytes: Cell<usize>,
    budget: Cell<Option<usize>>,
}

/// Global allocator wrapper with shared tallies. Clones share the same stats.
#[derive(Clone, Default)]
pub struct CountingAlloc {
    stats: Rc<AllocStats>,
}

impl CountingAlloc {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocations(&self) -> usize {
        self.stats.allocations.get()
    }

    pub fn frees(&self) -> usize {
        self.stats.frees.get()
    }

    pub fn live_bytes(&self) -> usize {
        self.stats.live_bytes.get()
    }

    /// Lets `after` more allocations succeed, then refuses every request until
    /// [`unlimited`](Self::unlimited) is called.
    pub fn fail_after(&self, after: usize) {
        self.stats.budget.set(Some(after));
    }

    pub fn unlimited(&self) {
        self.stats.budget.set(None);
    }
}

impl Allocator for CountingAlloc {

    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        let stats = &self.stats;
        match stats.budget.get() {
            Some(0) => return None,
            Some(n) => stats.budget.set(Some(n - 1)),
            None => {},
        }
        let ptr = unsafe { GLOBAL_ALLOC.allocate_raw(size, align)? };
        stats.allocations.set(stats.allocations.get() + 1);
        stats.live_bytes.set(stats.live_bytes.get() + size);
        Some(ptr)
    }

    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        let stats = &self.stats;
        stats.frees.set(stats.frees.get() + 1);
        stats.live_bytes.set(stats.live_bytes.get() - size);
        unsafe { GLOBAL_ALLOC.free_raw(ptr, size, align) }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn probes_track_liveness() {
        let ledger = Ledger::new();
        let a = ledger.probe(1);
        let b = a.try_clone().unwrap();
        assert_eq!((ledger.live(), ledger.copies()), (2, 1));
        drop(a);
        drop(b);
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn triggers_fire_once() {
        let ledger = Ledger::new();
        let a = ledger.probe(4);
        ledger.fail_copy_after(1);
        let _b = a.try_clone().unwrap();
        let err = a.try_clone().unwrap_err();
        assert_eq!(err.to_string(), "copy of probe 4 refused");
        let _c = a.try_clone().unwrap();
        assert_eq!(ledger.live(), 3);
    }

    #[test]
    fn budget_refuses_allocations() {
        let alloc = CountingAlloc::new();
        alloc.fail_after(1);
        let ptr = alloc.allocate_uninit::<u32>(4).unwrap();
        assert!(alloc.allocate_uninit::<u32>(4).is_none());
        assert_eq!(alloc.live_bytes(), 16);
        unsafe { alloc.free_uninit(ptr, 4) };
        assert_eq!((alloc.allocations(), alloc.frees(), alloc.live_bytes()), (1, 1, 0));
    }
}
