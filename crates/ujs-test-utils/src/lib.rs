//! Test utilities for UnleashedJS runtime development.
//!
//! Provides [`CountingAlloc`], a pass-through global allocator that counts
//! deallocations of watched blocks and records when each was freed.
//! Install it in an integration test binary to check that an allocation is
//! freed exactly once, or that one block is freed before another:
//!
//! ```ignore
//! use ujs_test_utils::CountingAlloc;
//!
//! #[global_allocator]
//! static ALLOC: CountingAlloc = CountingAlloc::new();
//!
//! let watch = ALLOC.watch(value_addr).unwrap();
//! drop(value);
//! assert_eq!(ALLOC.frees(watch), 1);
//! ALLOC.unwatch(watch);
//! ```

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of addresses that can be watched at once.
pub const WATCH_SLOTS: usize = 16;

struct WatchSlot {
    addr: AtomicUsize,
    frees: AtomicUsize,
    /// Sequence number of the most recent matching free, 0 if none.
    freed_at: AtomicUsize,
}

impl WatchSlot {
    const fn new() -> Self {
        Self {
            addr: AtomicUsize::new(0),
            frees: AtomicUsize::new(0),
            freed_at: AtomicUsize::new(0),
        }
    }
}

/// Ticket returned by [`CountingAlloc::watch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchId(usize);

/// Pass-through allocator over [`System`] that counts frees of watched
/// blocks.
///
/// A block matches a watch when the watched address lies inside it, so the
/// address of any byte of an allocation (not just its start) can be
/// watched. The allocator itself never allocates.
pub struct CountingAlloc {
    slots: [WatchSlot; WATCH_SLOTS],
    allocs: AtomicUsize,
    deallocs: AtomicUsize,
}

impl CountingAlloc {
    pub const fn new() -> Self {
        Self {
            slots: [const { WatchSlot::new() }; WATCH_SLOTS],
            allocs: AtomicUsize::new(0),
            deallocs: AtomicUsize::new(0),
        }
    }

    /// Start counting frees of the block containing `addr`.
    ///
    /// Returns `None` if `addr` is zero or all slots are taken.
    pub fn watch(&self, addr: usize) -> Option<WatchId> {
        if addr == 0 {
            return None;
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if slot
                .addr
                .compare_exchange(0, addr, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                slot.frees.store(0, Ordering::Release);
                slot.freed_at.store(0, Ordering::Release);
                return Some(WatchId(i));
            }
        }
        None
    }

    /// Number of times the watched block has been freed so far.
    pub fn frees(&self, id: WatchId) -> usize {
        self.slots[id.0].frees.load(Ordering::Acquire)
    }

    /// Position of the most recent free of the watched block in the global
    /// sequence of deallocations, or `None` if it has not been freed.
    ///
    /// Comparing two watches tells which block was freed first.
    pub fn freed_at(&self, id: WatchId) -> Option<usize> {
        match self.slots[id.0].freed_at.load(Ordering::Acquire) {
            0 => None,
            seq => Some(seq),
        }
    }

    /// Stop watching and free the slot.
    ///
    /// Call soon after the expected free: once a block is released its
    /// address can be handed out again and later frees would be counted.
    pub fn unwatch(&self, id: WatchId) {
        self.slots[id.0].addr.store(0, Ordering::Release);
    }

    /// Total allocations served since start-up.
    pub fn total_allocs(&self) -> usize {
        self.allocs.load(Ordering::Relaxed)
    }

    /// Total deallocations served since start-up, counting blocks moved by
    /// `realloc`.
    pub fn total_deallocs(&self) -> usize {
        self.deallocs.load(Ordering::Acquire)
    }

    fn record_free(&self, ptr: *mut u8, size: usize) {
        let seq = self.deallocs.fetch_add(1, Ordering::AcqRel) + 1;
        let start = ptr as usize;
        let end = start.saturating_add(size.max(1));
        for slot in &self.slots {
            let addr = slot.addr.load(Ordering::Acquire);
            if addr != 0 && addr >= start && addr < end {
                slot.frees.fetch_add(1, Ordering::AcqRel);
                slot.freed_at.store(seq, Ordering::Release);
            }
        }
    }
}

impl Default for CountingAlloc {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: every call forwards to `System` with the caller's arguments
// unchanged. The bookkeeping only touches atomics.
#[allow(unsafe_code)]
unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.record_free(ptr, layout.size());
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() && new_ptr != ptr {
            self.record_free(ptr, layout.size());
        }
        new_ptr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_counts_frees_inside_block() {
        let alloc = CountingAlloc::new();
        let layout = Layout::from_size_align(32, 8).unwrap();
        let id = alloc.watch(0x1000 + 8).unwrap();

        alloc.record_free(0x1000 as *mut u8, layout.size());
        assert_eq!(alloc.frees(id), 1);

        alloc.record_free(0x2000 as *mut u8, layout.size());
        assert_eq!(alloc.frees(id), 1);

        alloc.unwatch(id);
    }

    #[test]
    fn freed_at_orders_frees() {
        let alloc = CountingAlloc::new();
        let first = alloc.watch(0x1000).unwrap();
        let second = alloc.watch(0x2000).unwrap();
        assert_eq!(alloc.freed_at(first), None);

        alloc.record_free(0x2000 as *mut u8, 16);
        alloc.record_free(0x3000 as *mut u8, 16);
        alloc.record_free(0x1000 as *mut u8, 16);

        assert_eq!(alloc.freed_at(second), Some(1));
        assert_eq!(alloc.freed_at(first), Some(3));
        assert_eq!(alloc.total_deallocs(), 3);
    }

    #[test]
    fn rewatch_clears_history() {
        let alloc = CountingAlloc::new();
        let id = alloc.watch(0x1000).unwrap();
        alloc.record_free(0x1000 as *mut u8, 8);
        alloc.unwatch(id);

        let id = alloc.watch(0x1000).unwrap();
        assert_eq!(alloc.frees(id), 0);
        assert_eq!(alloc.freed_at(id), None);
    }

    #[test]
    #[allow(unsafe_code)]
    fn counts_forwarded_calls() {
        let alloc = CountingAlloc::new();
        let layout = Layout::from_size_align(64, 8).unwrap();
        // SAFETY: layout has non-zero size; the block is freed with the same
        // layout it was allocated with.
        let ptr = unsafe { alloc.alloc(layout) };
        assert!(!ptr.is_null());
        let id = alloc.watch(ptr as usize + 10).unwrap();
        unsafe { alloc.dealloc(ptr, layout) };

        assert_eq!(alloc.total_allocs(), 1);
        assert_eq!(alloc.total_deallocs(), 1);
        assert_eq!(alloc.frees(id), 1);
        assert_eq!(alloc.freed_at(id), Some(1));
    }

    #[test]
    fn block_end_is_exclusive() {
        let alloc = CountingAlloc::new();
        let id = alloc.watch(0x1020).unwrap();
        alloc.record_free(0x1000 as *mut u8, 32);
        assert_eq!(alloc.frees(id), 0);
    }

    #[test]
    fn unwatch_releases_slot() {
        let alloc = CountingAlloc::new();
        let ids: Vec<_> = (1..=WATCH_SLOTS).map(|i| alloc.watch(i * 64).unwrap()).collect();
        assert!(alloc.watch(0x9999).is_none());
        alloc.unwatch(ids[3]);
        assert_eq!(alloc.watch(0x9999), Some(ids[3]));
    }

    #[test]
    fn zero_address_not_watchable() {
        assert!(CountingAlloc::new().watch(0).is_none());
    }
}
