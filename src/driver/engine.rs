//! Per-direction transfer engine.
//!
//! The engine owns one [`TransferQueue`] and drains its head on every hardware
//! event. It is the only place that arms or disarms the port's request lines:
//! arming happens when the first transfer lands in an idle queue, disarming
//! when the queue empties (drain, abort, terminate) or a fault flushes it.

use super::config::{Direction, EngineState, TransferFormat};
use super::error::Error;
use super::interrupt::{InterruptEnable, StatusFlags};
use super::queue::TransferQueue;
use super::transfer::{EnqueueError, Transfer, TransferCallback, TransferEvent, TransferStatus};
use crate::hal::SaiPort;
use crate::internal::word;

#[cfg(feature = "log")]
use log::{debug, warn};

/// Transfer state machine of one direction.
///
/// # Type Parameters
/// * `N` - Number of transfers that can be queued
pub struct TransferEngine<'a, const N: usize> {
    /// Direction served by this engine
    direction: Direction,
    /// Idle / Busy / Error
    state: EngineState,
    /// Format set by the last successful configure
    format: Option<TransferFormat>,
    /// Queued transfers
    queue: TransferQueue<'a, N>,
    /// Bytes moved since the last configure or reset
    transferred: u64,
    /// Flags of the fault that moved the engine to `Error`
    last_fault: Option<StatusFlags>,
    /// Whether the port request lines are enabled
    armed: bool,
}

impl<'a, const N: usize> TransferEngine<'a, N> {
    /// Create an unconfigured, idle engine. Const-compatible.
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            state: EngineState::Idle,
            format: None,
            queue: TransferQueue::new(),
            transferred: 0,
            last_fault: None,
            armed: false,
        }
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Direction served by this engine
    #[inline(always)]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current state
    #[inline(always)]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Active format, `None` until configured
    #[inline(always)]
    pub fn format(&self) -> Option<&TransferFormat> {
        self.format.as_ref()
    }

    /// Queue of pending transfers
    #[inline(always)]
    pub fn queue(&self) -> &TransferQueue<'a, N> {
        &self.queue
    }

    /// Bytes moved since the last configure or reset, head progress included
    #[inline(always)]
    pub fn transferred_count(&self) -> u64 {
        self.transferred
    }

    /// Bytes moved on the head transfer
    #[inline]
    pub fn head_completed(&self) -> usize {
        self.queue.head().map_or(0, Transfer::completed)
    }

    /// Fault that put the engine in `Error`
    #[inline(always)]
    pub fn last_fault(&self) -> Option<StatusFlags> {
        self.last_fault
    }

    /// Whether the request lines are currently enabled
    #[inline(always)]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    // =========================================================================
    // Producer Side
    // =========================================================================

    /// Validate and store a format. Not allowed while busy.
    ///
    /// Configuring an engine in `Error` performs the reset first.
    pub fn configure<P: SaiPort>(&mut self, port: &mut P, format: TransferFormat) -> Result<(), Error> {
        if self.state == EngineState::Busy {
            return Err(Error::InvalidState);
        }
        format.validate()?;

        if self.state == EngineState::Error {
            self.reset(port);
        }

        port.apply_format(self.direction, &format);
        self.format = Some(format);
        self.transferred = 0;
        self.state = EngineState::Idle;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "SAI {:?} configured: {} Hz, {} bit, mask {:#x}, watermark {}",
            self.direction,
            format.sample_rate_hz,
            format.word_width.bits(),
            format.channel_mask.bits(),
            format.watermark
        );

        Ok(())
    }

    /// Queue a transfer; arms the port on the idle-to-busy edge only.
    pub fn enqueue<P: SaiPort>(
        &mut self,
        port: &mut P,
        transfer: Transfer<'a>,
    ) -> Result<(), EnqueueError<'a>> {
        if let Err(e) = transfer.check(self.direction) {
            return Err(EnqueueError::new(e, transfer));
        }
        let Some(format) = self.format else {
            return Err(EnqueueError::new(Error::InvalidState, transfer));
        };
        if self.state == EngineState::Error {
            return Err(EnqueueError::new(Error::InvalidState, transfer));
        }

        if let Err(transfer) = self.queue.enqueue(transfer) {
            return Err(EnqueueError::new(Error::QueueFull, transfer));
        }

        if self.state == EngineState::Idle {
            self.arm(port, &format);
            self.state = EngineState::Busy;
        }
        Ok(())
    }

    /// Drop the head transfer. Returns its completed byte count.
    ///
    /// The remaining transfers keep draining; the port is disarmed only when
    /// the queue is left empty.
    pub fn abort<P: SaiPort, C: TransferCallback<'a>>(
        &mut self,
        port: &mut P,
        callback: &mut C,
    ) -> Option<usize> {
        if self.state != EngineState::Busy {
            return None;
        }
        let aborted = self.queue.abort_head()?;
        let completed = aborted.completed();
        let queued = self.queue.len();
        if queued == 0 {
            self.disarm(port);
            self.state = EngineState::Idle;
        }

        #[cfg(feature = "log")]
        debug!(
            "SAI {:?} aborted transfer at {}/{} bytes",
            self.direction,
            completed,
            aborted.len()
        );

        callback.on_event(TransferEvent {
            direction: self.direction,
            transfer: Some(aborted),
            status: TransferStatus::Aborted,
            queued,
        });
        Some(completed)
    }

    /// Flush the queue without callbacks and return to `Idle`.
    ///
    /// An engine in `Error` stays there; only a reset recovers it.
    pub fn terminate<P: SaiPort>(&mut self, port: &mut P) {
        match self.state {
            EngineState::Busy => {
                self.disarm(port);
                let _dropped = self.queue.clear();
                self.state = EngineState::Idle;

                #[cfg(feature = "log")]
                debug!("SAI {:?} terminated, {} transfers dropped", self.direction, _dropped);
            }
            EngineState::Idle | EngineState::Error => {}
        }
    }

    /// Disarm, flush, software-reset the transceiver and return to `Idle`.
    pub fn reset<P: SaiPort>(&mut self, port: &mut P) {
        if self.armed {
            self.disarm(port);
        }
        self.queue.reset();
        port.software_reset(self.direction);
        let stale = port.fault_flags(self.direction);
        if stale.has_fault() {
            port.clear_fault_flags(self.direction, stale);
        }
        self.transferred = 0;
        self.last_fault = None;
        self.state = EngineState::Idle;

        #[cfg(feature = "defmt")]
        defmt::info!("SAI {:?} reset", self.direction);
    }

    // =========================================================================
    // Consumer Side
    // =========================================================================

    /// Service one hardware event: move one unit, complete or fail the head.
    ///
    /// Does nothing unless the engine is busy.
    pub fn on_hardware_event<P: SaiPort, C: TransferCallback<'a>>(
        &mut self,
        port: &mut P,
        callback: &mut C,
    ) {
        if self.state != EngineState::Busy {
            return;
        }
        let Some(format) = self.format else {
            return;
        };

        let faults = port.fault_flags(self.direction);
        if faults.has_fault() {
            port.clear_fault_flags(self.direction, faults);
            self.fail(port, callback, faults);
            return;
        }

        let (moved, fault) = self.move_unit(port, &format);
        self.transferred += moved as u64;
        let done = self.queue.advance_completed(moved);

        if let Some(flags) = fault {
            if let Some(done) = done {
                self.complete(callback, done);
            }
            port.clear_fault_flags(self.direction, flags);
            self.fail(port, callback, flags);
            return;
        }

        if let Some(done) = done {
            if self.queue.is_empty() {
                self.disarm(port);
                self.state = EngineState::Idle;
            }
            self.complete(callback, done);
        }
    }

    /// Move up to one event's worth of words between the port and the head.
    ///
    /// Returns the bytes moved and, if a word access failed, its fault flags.
    /// Only whole words are counted; the last word of a buffer may be short.
    fn move_unit<P: SaiPort>(
        &mut self,
        port: &mut P,
        format: &TransferFormat,
    ) -> (usize, Option<StatusFlags>) {
        let bytes_per_word = format.bytes_per_word();
        let lines = format.channel_count();
        let Some(head) = self.queue.head_mut() else {
            return (0, None);
        };
        let budget = format.bytes_per_event().min(head.remaining());
        let mut word_index = head.completed() / bytes_per_word;
        let mut moved = 0;

        match self.direction {
            Direction::Transmit => {
                for chunk in head.pending(budget).chunks(bytes_per_word) {
                    let channel = format.channel_mask.nth(word_index % lines).unwrap_or(0);
                    if let Err(flags) = port.write_word(channel, word::pack(chunk)) {
                        return (moved, Some(flags));
                    }
                    moved += chunk.len();
                    word_index += 1;
                }
            }
            Direction::Receive => {
                for chunk in head.pending_mut(budget).chunks_mut(bytes_per_word) {
                    let channel = format.channel_mask.nth(word_index % lines).unwrap_or(0);
                    match port.read_word(channel) {
                        Ok(value) => word::unpack(value, chunk),
                        Err(flags) => return (moved, Some(flags)),
                    }
                    moved += chunk.len();
                    word_index += 1;
                }
            }
        }
        (moved, None)
    }

    fn complete<C: TransferCallback<'a>>(&mut self, callback: &mut C, done: Transfer<'a>) {
        callback.on_event(TransferEvent {
            direction: self.direction,
            transfer: Some(done),
            status: TransferStatus::Complete,
            queued: self.queue.len(),
        });
    }

    /// Enter `Error`: disarm, flush, report the in-flight transfer once.
    fn fail<P: SaiPort, C: TransferCallback<'a>>(
        &mut self,
        port: &mut P,
        callback: &mut C,
        flags: StatusFlags,
    ) {
        self.disarm(port);
        let in_flight = self.queue.abort_head();
        let _flushed = self.queue.clear();
        self.state = EngineState::Error;
        self.last_fault = Some(flags);

        #[cfg(feature = "log")]
        warn!(
            "SAI {:?} hardware fault: flags={:#010x} sync_error={} fifo_error={} flushed={}",
            self.direction,
            flags.to_raw(),
            flags.sync_error,
            flags.fifo_error,
            _flushed
        );

        callback.on_event(TransferEvent {
            direction: self.direction,
            transfer: in_flight,
            status: TransferStatus::Fault(flags),
            queued: 0,
        });
    }

    fn arm<P: SaiPort>(&mut self, port: &mut P, format: &TransferFormat) {
        let stale = port.fault_flags(self.direction);
        if stale.has_fault() {
            port.clear_fault_flags(self.direction, stale);
        }
        port.arm_request(self.direction, InterruptEnable::for_mode(format.mode));
        self.armed = true;

        #[cfg(feature = "defmt")]
        defmt::debug!("SAI {:?} requests armed", self.direction);
    }

    fn disarm<P: SaiPort>(&mut self, port: &mut P) {
        port.disarm_request(self.direction);
        self.armed = false;

        #[cfg(feature = "defmt")]
        defmt::debug!("SAI {:?} requests disarmed", self.direction);
    }
}

// =============================================================================
// Tests
// =============================================================================
