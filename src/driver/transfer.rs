//! Transfer descriptors and completion events.
//!
//! A [`Transfer`] describes one caller-owned audio buffer. It is handed to the
//! driver on enqueue and handed back, through a [`TransferEvent`], when it
//! completes or is aborted.

use core::marker::PhantomData;

use super::config::Direction;
use super::error::Error;
use super::interrupt::StatusFlags;

// =============================================================================
// Transfer Descriptor
// =============================================================================

/// One queued audio buffer.
///
/// The buffer is borrowed for `'a` and never copied or freed by the driver.
/// `completed` only grows, and never exceeds `len`.
#[derive(Debug)]
pub struct Transfer<'a> {
    ptr: *mut u8,
    len: usize,
    completed: usize,
    writable: bool,
    _buffer: PhantomData<&'a mut [u8]>,
}

// SAFETY: A `Transfer` is a unique borrow of its buffer (or a shared borrow
// that is only ever read), so moving it to another context is sound.
unsafe impl Send for Transfer<'_> {}

impl<'a> Transfer<'a> {
    /// Describe a buffer to transmit. Read-only transfers cannot be received into.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            ptr: buffer.as_ptr().cast_mut(),
            len: buffer.len(),
            completed: 0,
            writable: false,
            _buffer: PhantomData,
        }
    }

    /// Describe a writable buffer, usable in both directions.
    pub fn new_mut(buffer: &'a mut [u8]) -> Self {
        Self {
            ptr: buffer.as_mut_ptr(),
            len: buffer.len(),
            completed: 0,
            writable: true,
            _buffer: PhantomData,
        }
    }

    /// Describe a buffer from a raw pointer and length.
    ///
    /// Null or zero-length descriptors are accepted here and rejected on enqueue.
    ///
    /// # Safety
    ///
    /// When `ptr` is non-null it must be valid for reads and writes of `len`
    /// bytes for `'a`, and nothing else may access that memory while the
    /// transfer is alive.
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Self {
        Self {
            ptr,
            len,
            completed: 0,
            writable: true,
            _buffer: PhantomData,
        }
    }

    /// Total bytes requested
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the descriptor requests zero bytes
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes transferred so far
    #[inline(always)]
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Bytes still to transfer
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.len - self.completed
    }

    /// Check if every byte has been transferred
    #[inline(always)]
    pub fn is_complete(&self) -> bool {
        self.completed == self.len
    }

    /// Check if the buffer may be written (received into)
    #[inline(always)]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Check if the buffer pointer is null
    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Buffer start address
    #[inline(always)]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    /// Validate the descriptor for `direction`.
    pub(crate) fn check(&self, direction: Direction) -> Result<(), Error> {
        if self.ptr.is_null() || self.len == 0 {
            return Err(Error::InvalidArgument);
        }
        if direction == Direction::Receive && !self.writable {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    /// Record `n` more transferred bytes, clamped to the remaining length.
    /// Returns the number of bytes actually recorded.
    pub(crate) fn advance(&mut self, n: usize) -> usize {
        let n = n.min(self.remaining());
        self.completed += n;
        n
    }

    /// Next `n` untransferred bytes.
    pub(crate) fn pending(&self, n: usize) -> &[u8] {
        let n = n.min(self.remaining());
        if n == 0 {
            return &[];
        }
        // SAFETY: `check` rejected null pointers before the transfer was
        // queued, and `completed + n <= len` stays inside the borrowed buffer.
        unsafe { core::slice::from_raw_parts(self.ptr.add(self.completed), n) }
    }

    /// Next `n` untransferred bytes, writable. Empty for read-only transfers.
    pub(crate) fn pending_mut(&mut self, n: usize) -> &mut [u8] {
        let n = n.min(self.remaining());
        if n == 0 || !self.writable {
            return &mut [];
        }
        // SAFETY: as in `pending`; `writable` means the buffer came from a
        // unique borrow or from raw parts the caller vouched for.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.add(self.completed), n) }
    }

    /// Give the buffer back
    pub fn into_slice(self) -> &'a [u8] {
        if self.ptr.is_null() {
            return &[];
        }
        // SAFETY: the pointer and length come from a borrow valid for `'a`.
        unsafe { core::slice::from_raw_parts(self.ptr, self.len) }
    }

    /// Give a writable buffer back. `None` for read-only transfers.
    pub fn into_mut_slice(self) -> Option<&'a mut [u8]> {
        if !self.writable {
            return None;
        }
        if self.ptr.is_null() {
            return Some(&mut []);
        }
        // SAFETY: writable transfers hold a unique borrow valid for `'a`.
        Some(unsafe { core::slice::from_raw_parts_mut(self.ptr, self.len) })
    }
}

// =============================================================================
// Events and Callbacks
// =============================================================================

/// Outcome reported to the transfer callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferStatus {
    /// Every byte of the transfer moved
    Complete,
    /// The head transfer was aborted
    Aborted,
    /// The port reported a fault; the queue was flushed
    Fault(StatusFlags),
}

/// Event delivered to the transfer callback from the consumer context
#[derive(Debug)]
pub struct TransferEvent<'a> {
    /// Direction the event belongs to
    pub direction: Direction,
    /// Descriptor that finished, was aborted, or was in flight at the fault
    pub transfer: Option<Transfer<'a>>,
    /// What happened
    pub status: TransferStatus,
    /// Transfers still queued in this direction
    pub queued: usize,
}

/// Receiver of transfer events.
///
/// Implemented for every `FnMut(TransferEvent)` closure and `fn` item. The
/// callback runs in the interrupt (or DMA completion) context and has no
/// access to the driver handle, so it cannot reenter the enqueue path.
pub trait TransferCallback<'a> {
    /// Handle one event
    fn on_event(&mut self, event: TransferEvent<'a>);
}

impl<'a, F> TransferCallback<'a> for F
where
    F: FnMut(TransferEvent<'a>),
{
    #[inline]
    fn on_event(&mut self, event: TransferEvent<'a>) {
        self(event);
    }
}

/// Callback that ignores every event (polling-only use)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCallback;

impl<'a> TransferCallback<'a> for NoCallback {
    #[inline]
    fn on_event(&mut self, _event: TransferEvent<'a>) {}
}

/// A rejected enqueue, handing the descriptor back to the caller
#[derive(Debug)]
pub struct EnqueueError<'a> {
    error: Error,
    transfer: Transfer<'a>,
}

impl<'a> EnqueueError<'a> {
    pub(crate) fn new(error: Error, transfer: Transfer<'a>) -> Self {
        Self { error, transfer }
    }

    /// Why the enqueue failed
    pub fn error(&self) -> Error {
        self.error
    }

    /// Take the rejected descriptor back
    pub fn into_transfer(self) -> Transfer<'a> {
        self.transfer
    }
}

impl From<EnqueueError<'_>> for Error {
    fn from(e: EnqueueError<'_>) -> Self {
        e.error
    }
}

impl core::fmt::Display for EnqueueError<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "enqueue rejected: {}", self.error)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;

    #[test]
    fn new_transfer_is_read_only() {
        let data = [1u8, 2, 3];
        let t = Transfer::new(&data);
        assert_eq!(t.len(), 3);
        assert_eq!(t.completed(), 0);
        assert_eq!(t.remaining(), 3);
        assert!(!t.is_writable());
        assert!(!t.is_complete());
    }

    #[test]
    fn read_only_transfer_rejected_for_receive() {
        let data = [0u8; 4];
        let t = Transfer::new(&data);
        assert_eq!(t.check(Direction::Transmit), Ok(()));
        assert_eq!(t.check(Direction::Receive), Err(Error::InvalidArgument));
    }

    #[test]
    fn empty_transfer_rejected() {
        let data: [u8; 0] = [];
        let t = Transfer::new(&data);
        assert!(t.is_empty());
        assert_eq!(t.check(Direction::Transmit), Err(Error::InvalidArgument));
    }

    #[test]
    fn null_transfer_rejected() {
        // SAFETY: a null descriptor is never dereferenced.
        let t = unsafe { Transfer::from_raw_parts(core::ptr::null_mut(), 16) };
        assert!(t.is_null());
        assert_eq!(t.check(Direction::Transmit), Err(Error::InvalidArgument));
        assert_eq!(t.into_slice(), &[] as &[u8]);
    }

    #[test]
    fn advance_clamps_to_length() {
        let mut data = [0u8; 10];
        let mut t = Transfer::new_mut(&mut data);
        assert_eq!(t.advance(4), 4);
        assert_eq!(t.advance(100), 6);
        assert_eq!(t.completed(), 10);
        assert!(t.is_complete());
        assert_eq!(t.advance(1), 0);
    }

    #[test]
    fn pending_tracks_completed_offset() {
        let data = [10u8, 11, 12, 13, 14];
        let mut t = Transfer::new(&data);
        assert_eq!(t.pending(2), &[10, 11]);
        t.advance(2);
        assert_eq!(t.pending(8), &[12, 13, 14]);
        t.advance(3);
        assert!(t.pending(1).is_empty());
    }

    #[test]
    fn pending_mut_writes_into_buffer() {
        let mut data = [0u8; 4];
        let mut t = Transfer::new_mut(&mut data);
        t.advance(1);
        t.pending_mut(2).copy_from_slice(&[7, 8]);
        t.advance(2);
        let buf = t.into_mut_slice().unwrap();
        assert_eq!(buf, &[0, 7, 8, 0]);
    }

    #[test]
    fn pending_mut_empty_for_read_only() {
        let data = [1u8, 2];
        let mut t = Transfer::new(&data);
        assert!(t.pending_mut(2).is_empty());
        assert!(t.into_mut_slice().is_none());
    }

    #[test]
    fn closure_is_a_callback() {
        let mut seen = Vec::new();
        {
            let mut cb = |event: TransferEvent<'_>| seen.push((event.direction, event.status));
            cb.on_event(TransferEvent {
                direction: Direction::Receive,
                transfer: None,
                status: TransferStatus::Aborted,
                queued: 0,
            });
        }
        assert_eq!(seen, [(Direction::Receive, TransferStatus::Aborted)]);
    }

    #[test]
    fn enqueue_error_hands_transfer_back() {
        let data = [5u8; 3];
        let err = EnqueueError::new(Error::QueueFull, Transfer::new(&data));
        assert_eq!(err.error(), Error::QueueFull);
        let t = err.into_transfer();
        assert_eq!(t.into_slice(), &[5, 5, 5]);
    }
}
