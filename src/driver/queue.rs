//! Fixed-capacity circular transfer queue.

use super::transfer::Transfer;

/// Circular arena of transfer slots with head/tail indices.
///
/// The producer only writes the tail slot, the consumer only touches the head
/// slot. Order is strict FIFO and no operation allocates.
pub struct TransferQueue<'a, const N: usize> {
    /// Descriptor slots
    slots: [Option<Transfer<'a>>; N],
    /// Slot being drained
    head: usize,
    /// Next free slot
    tail: usize,
    /// Occupied slots
    count: usize,
    /// Transfers popped after full completion
    completed_transfers: usize,
}

impl<'a, const N: usize> TransferQueue<'a, N> {
    /// Create an empty queue. Const-compatible.
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `N` must be at least 1.
    #[must_use]
    pub const fn new() -> Self {
        assert!(N >= 1, "transfer queue needs at least one slot");
        Self {
            slots: [const { None }; N],
            head: 0,
            tail: 0,
            count: 0,
            completed_transfers: 0,
        }
    }

    /// Number of slots
    #[inline(always)]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of queued transfers
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Check if no transfer is queued
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if every slot is occupied
    #[inline(always)]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.count == N
    }

    /// Transfers popped after full completion since creation or the last reset
    #[inline(always)]
    pub const fn completed_transfers(&self) -> usize {
        self.completed_transfers
    }

    /// Append a transfer at the tail.
    ///
    /// Hands the transfer back when the queue is full; the queue is left
    /// untouched in that case.
    pub fn enqueue(&mut self, transfer: Transfer<'a>) -> Result<(), Transfer<'a>> {
        if self.is_full() {
            return Err(transfer);
        }
        self.slots[self.tail] = Some(transfer);
        self.tail = (self.tail + 1) % N;
        self.count += 1;
        Ok(())
    }

    /// Transfer currently being drained
    #[inline]
    pub fn head(&self) -> Option<&Transfer<'a>> {
        self.slots[self.head].as_ref()
    }

    /// Transfer currently being drained, mutably
    #[inline]
    pub(crate) fn head_mut(&mut self) -> Option<&mut Transfer<'a>> {
        self.slots[self.head].as_mut()
    }

    /// Record `n` bytes on the head transfer.
    ///
    /// Returns the head once it is complete, after removing it from the queue.
    pub fn advance_completed(&mut self, n: usize) -> Option<Transfer<'a>> {
        let head = self.head_mut()?;
        head.advance(n);
        if !head.is_complete() {
            return None;
        }
        let done = self.pop_head();
        if done.is_some() {
            self.completed_transfers += 1;
        }
        done
    }

    /// Remove the head transfer whatever its progress.
    pub fn abort_head(&mut self) -> Option<Transfer<'a>> {
        self.pop_head()
    }

    /// Drop every queued transfer. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.count;
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
        dropped
    }

    /// Clear the queue and the completed-transfer counter
    pub fn reset(&mut self) {
        self.clear();
        self.completed_transfers = 0;
    }

    /// Iterate over queued transfers, head first
    pub fn iter(&self) -> impl Iterator<Item = &Transfer<'a>> {
        (0..self.count).filter_map(move |i| self.slots[(self.head + i) % N].as_ref())
    }

    fn pop_head(&mut self) -> Option<Transfer<'a>> {
        let transfer = self.slots[self.head].take()?;
        self.head = (self.head + 1) % N;
        self.count -= 1;
        Some(transfer)
    }
}

impl<const N: usize> Default for TransferQueue<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
