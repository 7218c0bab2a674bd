//! Counting waker for polling futures by hand in tests.

#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::task::{RawWaker, RawWakerVTable, Waker};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) struct WakeCounter {
    count: AtomicUsize,
}

impl WakeCounter {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            count: AtomicUsize::new(0),
        })
    }

    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Waker that bumps `counter` on every wake
pub(crate) fn counting_waker(counter: Arc<WakeCounter>) -> Waker {
    fn clone(ptr: *const ()) -> RawWaker {
        // SAFETY: `ptr` comes from `Arc::into_raw` below; the clone takes a
        // new strong reference and leaves the original untouched.
        unsafe { Arc::increment_strong_count(ptr.cast::<WakeCounter>()) };
        RawWaker::new(ptr, &VTABLE)
    }

    fn wake(ptr: *const ()) {
        // SAFETY: consumes the strong reference owned by this waker.
        let counter = unsafe { Arc::from_raw(ptr.cast::<WakeCounter>()) };
        counter.count.fetch_add(1, Ordering::SeqCst);
    }

    fn wake_by_ref(ptr: *const ()) {
        // SAFETY: the waker still owns its reference; nothing is released.
        let counter = unsafe { &*ptr.cast::<WakeCounter>() };
        counter.count.fetch_add(1, Ordering::SeqCst);
    }

    fn drop(ptr: *const ()) {
        // SAFETY: releases the strong reference owned by this waker.
        unsafe { Arc::decrement_strong_count(ptr.cast::<WakeCounter>()) };
    }

    static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, wake, wake_by_ref, drop);

    let raw = RawWaker::new(Arc::into_raw(counter).cast::<()>(), &VTABLE);
    // SAFETY: the vtable functions uphold the `RawWaker` contract for an `Arc`.
    unsafe { Waker::from_raw(raw) }
}
