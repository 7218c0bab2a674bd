//! Testing utilities and mock implementations
//!
//! Mock hardware for exercising the transfer engine on the host: a scripted
//! [`MockPort`], a [`MockDelay`] that only counts, and an [`EventLog`] whose
//! [`Recorder`] callbacks capture every transfer event.
//!
//! Only available when running `cargo test`.

#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::driver::config::{Direction, TransferFormat};
use crate::driver::interrupt::{InterruptEnable, StatusFlags};
use crate::driver::transfer::{TransferCallback, TransferEvent, TransferStatus};
use crate::hal::{PortResult, SaiPort};

// =============================================================================
// Flag Helpers
// =============================================================================

/// Status with only the FIFO error flag set
pub fn fifo_error() -> StatusFlags {
    StatusFlags {
        fifo_error: true,
        ..StatusFlags::empty()
    }
}

/// Status with only the sync error flag set
pub fn sync_error() -> StatusFlags {
    StatusFlags {
        sync_error: true,
        ..StatusFlags::empty()
    }
}

fn index(direction: Direction) -> usize {
    match direction {
        Direction::Transmit => 0,
        Direction::Receive => 1,
    }
}

// =============================================================================
// Mock Port
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct DirectionState {
    status: StatusFlags,
    fifo_request: bool,
    armed: Option<InterruptEnable>,
    arm_count: usize,
    disarm_count: usize,
    reset_count: usize,
    status_polls: usize,
    format: Option<TransferFormat>,
}

impl Default for DirectionState {
    fn default() -> Self {
        Self {
            status: StatusFlags::empty(),
            fifo_request: true,
            armed: None,
            arm_count: 0,
            disarm_count: 0,
            reset_count: 0,
            status_polls: 0,
            format: None,
        }
    }
}

/// Mock SAI port.
///
/// Receive data is scripted per data line with [`push_rx_words`](Self::push_rx_words);
/// reading an empty line latches a FIFO error. Transmitted words are recorded
/// with their data line. State is kept behind `RefCell` so tests can inspect
/// and script the port through a shared reference while a driver owns it.
///
/// # Example
///
/// ```ignore
/// let port = MockPort::new();
/// port.push_rx_words(0, &[0x1234]);
/// port.raise_fault(Direction::Transmit, fifo_error());
/// ```
#[derive(Debug, Default)]
pub struct MockPort {
    directions: RefCell<[DirectionState; 2]>,
    rx_words: RefCell<HashMap<u8, VecDeque<u32>>>,
    written: RefCell<Vec<(u8, u32)>>,
    /// Words accepted before transmit writes start failing
    write_limit: Cell<Option<usize>>,
}

impl MockPort {
    /// Create a mock port with empty FIFOs and the request flags set
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue words to be returned by `read_word(channel)`
    pub fn push_rx_words(&self, channel: u8, words: &[u32]) {
        self.rx_words
            .borrow_mut()
            .entry(channel)
            .or_default()
            .extend(words.iter().copied());
    }

    /// Words still waiting on a receive data line
    pub fn rx_remaining(&self, channel: u8) -> usize {
        self.rx_words.borrow().get(&channel).map_or(0, VecDeque::len)
    }

    /// Latch fault flags on a direction
    pub fn raise_fault(&self, direction: Direction, flags: StatusFlags) {
        let mut dirs = self.directions.borrow_mut();
        let state = &mut dirs[index(direction)];
        state.status = StatusFlags::from_raw(state.status.to_raw() | flags.to_raw());
    }

    /// Make transmit writes fail with a FIFO error after `words` more writes
    pub fn fail_writes_after(&self, words: usize) {
        self.write_limit.set(Some(self.written.borrow().len() + words));
    }

    /// Set or clear the FIFO request flag reported by `status_flags`
    pub fn set_fifo_request(&self, direction: Direction, requesting: bool) {
        self.directions.borrow_mut()[index(direction)].fifo_request = requesting;
    }

    /// Every transmitted word with its data line, in order
    pub fn written_words(&self) -> Vec<(u8, u32)> {
        self.written.borrow().clone()
    }

    /// Forget the transmitted words
    pub fn clear_written(&self) {
        self.written.borrow_mut().clear();
    }

    /// Number of `arm_request` calls
    pub fn arm_count(&self, direction: Direction) -> usize {
        self.state(direction).arm_count
    }

    /// Number of `disarm_request` calls
    pub fn disarm_count(&self, direction: Direction) -> usize {
        self.state(direction).disarm_count
    }

    /// Number of `software_reset` calls
    pub fn reset_count(&self, direction: Direction) -> usize {
        self.state(direction).reset_count
    }

    /// Number of `status_flags` calls
    pub fn status_polls(&self, direction: Direction) -> usize {
        self.state(direction).status_polls
    }

    /// Enables passed to the last `arm_request`, `None` while disarmed
    pub fn armed_with(&self, direction: Direction) -> Option<InterruptEnable> {
        self.state(direction).armed
    }

    /// Check if a direction's request lines are enabled
    pub fn is_armed(&self, direction: Direction) -> bool {
        self.state(direction).armed.is_some()
    }

    /// Format passed to the last `apply_format`
    pub fn applied_format(&self, direction: Direction) -> Option<TransferFormat> {
        self.state(direction).format
    }

    fn state(&self, direction: Direction) -> DirectionState {
        self.directions.borrow()[index(direction)]
    }
}

impl SaiPort for MockPort {
    fn read_word(&mut self, channel: u8) -> PortResult<u32> {
        let word = self
            .rx_words
            .borrow_mut()
            .get_mut(&channel)
            .and_then(VecDeque::pop_front);
        word.ok_or_else(|| {
            self.raise_fault(Direction::Receive, fifo_error());
            fifo_error()
        })
    }

    fn write_word(&mut self, channel: u8, word: u32) -> PortResult<()> {
        let mut written = self.written.borrow_mut();
        if self.write_limit.get().is_some_and(|limit| written.len() >= limit) {
            self.raise_fault(Direction::Transmit, fifo_error());
            return Err(fifo_error());
        }
        written.push((channel, word));
        Ok(())
    }

    fn arm_request(&mut self, direction: Direction, enable: InterruptEnable) {
        let mut dirs = self.directions.borrow_mut();
        let state = &mut dirs[index(direction)];
        state.armed = Some(enable);
        state.arm_count += 1;
    }

    fn disarm_request(&mut self, direction: Direction) {
        let mut dirs = self.directions.borrow_mut();
        let state = &mut dirs[index(direction)];
        state.armed = None;
        state.disarm_count += 1;
    }

    fn status_flags(&mut self, direction: Direction) -> StatusFlags {
        let mut dirs = self.directions.borrow_mut();
        let state = &mut dirs[index(direction)];
        state.status_polls += 1;
        StatusFlags {
            fifo_request: state.fifo_request,
            ..state.status
        }
    }

    fn clear_fault_flags(&mut self, direction: Direction, flags: StatusFlags) {
        let mut dirs = self.directions.borrow_mut();
        let state = &mut dirs[index(direction)];
        state.status = StatusFlags::from_raw(state.status.to_raw() & !flags.to_clear_mask());
    }

    fn apply_format(&mut self, direction: Direction, format: &TransferFormat) {
        self.directions.borrow_mut()[index(direction)].format = Some(*format);
    }

    fn software_reset(&mut self, direction: Direction) {
        let mut dirs = self.directions.borrow_mut();
        let state = &mut dirs[index(direction)];
        state.reset_count += 1;
        state.status = StatusFlags::empty();
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Delay provider that records requested time instead of waiting.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    total_ns: Rc<Cell<u64>>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in microseconds
    pub fn total_us(&self) -> u64 {
        self.total_ns.get() / 1_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(ns));
    }
}

// =============================================================================
// Event Recording
// =============================================================================

/// One recorded transfer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub direction: Direction,
    pub status: TransferStatus,
    /// Length of the carried descriptor
    pub len: Option<usize>,
    /// Completed bytes of the carried descriptor
    pub completed: Option<usize>,
    /// Buffer contents of the carried descriptor
    pub data: Option<Vec<u8>>,
    pub queued: usize,
}

/// Shared log of transfer events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Rc<RefCell<Vec<Record>>>,
}

/// Callback appending to an [`EventLog`]
#[derive(Debug, Clone)]
pub struct Recorder {
    records: Rc<RefCell<Vec<Record>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback recording into this log
    pub fn callback(&self) -> Recorder {
        Recorder {
            records: Rc::clone(&self.records),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Copy of every record, oldest first
    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }

    /// Lengths of completed descriptors, in completion order
    pub fn completed_lengths(&self, direction: Direction) -> Vec<usize> {
        self.filter(direction, TransferStatus::Complete)
            .filter_map(|r| r.len)
            .collect()
    }

    /// Buffers of completed descriptors, in completion order
    pub fn completed_buffers(&self, direction: Direction) -> Vec<Vec<u8>> {
        self.filter(direction, TransferStatus::Complete)
            .filter_map(|r| r.data)
            .collect()
    }

    /// `(len, completed)` of aborted descriptors
    pub fn aborted(&self, direction: Direction) -> Vec<(usize, usize)> {
        self.filter(direction, TransferStatus::Aborted)
            .filter_map(|r| Some((r.len?, r.completed?)))
            .collect()
    }

    /// `(flags, completed of the in-flight descriptor)` of fault events
    pub fn faults(&self, direction: Direction) -> Vec<(StatusFlags, Option<usize>)> {
        self.records()
            .into_iter()
            .filter(|r| r.direction == direction)
            .filter_map(|r| match r.status {
                TransferStatus::Fault(flags) => Some((flags, r.completed)),
                _ => None,
            })
            .collect()
    }

    fn filter(&self, direction: Direction, status: TransferStatus) -> impl Iterator<Item = Record> {
        self.records()
            .into_iter()
            .filter(move |r| r.direction == direction && r.status == status)
    }
}

impl<'a> TransferCallback<'a> for Recorder {
    fn on_event(&mut self, event: TransferEvent<'a>) {
        let (len, completed, data) = match event.transfer {
            Some(transfer) => (
                Some(transfer.len()),
                Some(transfer.completed()),
                Some(transfer.into_slice().to_vec()),
            ),
            None => (None, None, None),
        };
        self.records.borrow_mut().push(Record {
            direction: event.direction,
            status: event.status,
            len,
            completed,
            data,
            queued: event.queued,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rx_line_latches_fifo_error() {
        let mut port = MockPort::new();
        port.push_rx_words(2, &[5]);
        assert_eq!(port.read_word(2), Ok(5));
        assert_eq!(port.read_word(2), Err(fifo_error()));
        assert!(port.fault_flags(Direction::Receive).fifo_error);
        assert!(!port.fault_flags(Direction::Transmit).has_fault());
    }

    #[test]
    fn write_limit_fails_after_budget() {
        let mut port = MockPort::new();
        port.fail_writes_after(1);
        assert!(port.write_word(0, 1).is_ok());
        assert_eq!(port.write_word(0, 2), Err(fifo_error()));
        assert_eq!(port.written_words(), [(0, 1)]);
    }

    #[test]
    fn clear_fault_flags_keeps_request() {
        let mut port = MockPort::new();
        port.raise_fault(Direction::Transmit, sync_error());
        port.clear_fault_flags(Direction::Transmit, sync_error());
        let flags = port.status_flags(Direction::Transmit);
        assert!(!flags.has_fault());
        assert!(flags.fifo_request);
    }

    #[test]
    fn delay_accumulates() {
        let delay = MockDelay::new();
        let mut handle = delay.clone();
        handle.delay_us(10);
        handle.delay_ns(5_000);
        assert_eq!(delay.total_us(), 15);
    }
}
