//! SAI driver handle
//!
//! [`Sai`] owns the hardware port, the transfer callback and one
//! [`TransferEngine`] per direction. Application code enqueues buffers through
//! [`send`](Sai::send) / [`receive`](Sai::receive); the interrupt (or DMA
//! completion) handler calls [`handle_interrupt`](Sai::handle_interrupt).
//!
//! # Example
//!
//! ```ignore
//! let mut sai: Sai<'_, _, _, 4> = Sai::new(port, |event: TransferEvent<'_>| {
//!     if let TransferStatus::Fault(flags) = event.status {
//!         // recover later with sai.reset(event.direction)
//!     }
//! });
//!
//! sai.configure(Direction::Transmit, TransferFormat::new())?;
//! sai.send(Transfer::new(&samples)).map_err(|e| e.error())?;
//! ```

use embedded_hal::delay::DelayNs;

use super::config::{Direction, EngineState, TransferFormat};
use super::engine::TransferEngine;
use super::error::{Error, Result};
use super::interrupt::StatusFlags;
use super::transfer::{EnqueueError, Transfer, TransferCallback};
use crate::hal::{BlockingTransfer, SaiPort};
use crate::internal::constants::DEFAULT_QUEUE_SIZE;

/// Queued, non-blocking SAI transfer driver.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the queued buffers
/// * `P` - Hardware port
/// * `C` - Transfer event callback
/// * `N` - Queue capacity per direction
pub struct Sai<'a, P, C, const N: usize> {
    port: P,
    callback: C,
    tx: TransferEngine<'a, N>,
    rx: TransferEngine<'a, N>,
}

impl<'a, P, C, const N: usize> Sai<'a, P, C, N>
where
    P: SaiPort,
    C: TransferCallback<'a>,
{
    /// Create an unconfigured driver. Both directions start `Idle`.
    pub const fn new(port: P, callback: C) -> Self {
        Self {
            port,
            callback,
            tx: TransferEngine::new(Direction::Transmit),
            rx: TransferEngine::new(Direction::Receive),
        }
    }

    /// Give back the port and the callback
    pub fn release(self) -> (P, C) {
        (self.port, self.callback)
    }

    /// Hardware port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Engine of one direction
    pub fn engine(&self, direction: Direction) -> &TransferEngine<'a, N> {
        match direction {
            Direction::Transmit => &self.tx,
            Direction::Receive => &self.rx,
        }
    }

    fn parts(&mut self, direction: Direction) -> (&mut TransferEngine<'a, N>, &mut P, &mut C) {
        let engine = match direction {
            Direction::Transmit => &mut self.tx,
            Direction::Receive => &mut self.rx,
        };
        (engine, &mut self.port, &mut self.callback)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Configure one direction.
    ///
    /// Returns `Err(Error::InvalidState)` while the direction is busy and
    /// `Err(Error::Config(_))` for an invalid format. A direction in `Error`
    /// is reset before the new format is applied.
    pub fn configure(&mut self, direction: Direction, format: TransferFormat) -> Result<()> {
        let (engine, port, _) = self.parts(direction);
        engine.configure(port, format)
    }

    /// Format of one direction, `None` until configured
    pub fn format(&self, direction: Direction) -> Option<&TransferFormat> {
        self.engine(direction).format()
    }

    // =========================================================================
    // Producer API
    // =========================================================================

    /// Queue a transfer on one direction without blocking.
    ///
    /// On rejection the descriptor is handed back inside the error.
    pub fn enqueue(
        &mut self,
        direction: Direction,
        transfer: Transfer<'a>,
    ) -> core::result::Result<(), EnqueueError<'a>> {
        let (engine, port, _) = self.parts(direction);
        let result = engine.enqueue(port, transfer);

        #[cfg(feature = "log")]
        {
            if let Err(e) = &result {
                log::warn!("SAI {:?} enqueue rejected: {}", direction, e.error());
            }
        }

        result
    }

    /// Queue a buffer for transmission
    pub fn send(&mut self, transfer: Transfer<'a>) -> core::result::Result<(), EnqueueError<'a>> {
        self.enqueue(Direction::Transmit, transfer)
    }

    /// Queue a writable buffer for reception
    pub fn receive(&mut self, transfer: Transfer<'a>) -> core::result::Result<(), EnqueueError<'a>> {
        self.enqueue(Direction::Receive, transfer)
    }

    /// Abort the head transfer of one direction.
    ///
    /// Returns the bytes it had moved, or `None` if the direction was not busy.
    /// Queued transfers behind it keep running.
    pub fn abort(&mut self, direction: Direction) -> Option<usize> {
        let (engine, port, callback) = self.parts(direction);
        engine.abort(port, callback)
    }

    /// Drop every queued transfer of one direction without callbacks
    pub fn terminate(&mut self, direction: Direction) {
        let (engine, port, _) = self.parts(direction);
        engine.terminate(port);
    }

    /// Software-reset one direction, leaving it `Idle` with an empty queue.
    ///
    /// The only way out of `Error` besides reconfiguring.
    pub fn reset(&mut self, direction: Direction) {
        let (engine, port, _) = self.parts(direction);
        engine.reset(port);
    }

    // =========================================================================
    // Blocking I/O
    // =========================================================================

    /// Write `data` by polling the transmit FIFO.
    ///
    /// Only allowed while transmit is configured and idle.
    pub fn write_blocking<D: DelayNs>(&mut self, delay: D, data: &[u8]) -> Result<()> {
        let format = self.idle_format(Direction::Transmit)?;
        BlockingTransfer::new(delay).write(&mut self.port, &format, data)
    }

    /// Fill `buffer` by polling the receive FIFO.
    ///
    /// Only allowed while receive is configured and idle.
    pub fn read_blocking<D: DelayNs>(&mut self, delay: D, buffer: &mut [u8]) -> Result<()> {
        let format = self.idle_format(Direction::Receive)?;
        BlockingTransfer::new(delay).read(&mut self.port, &format, buffer)
    }

    fn idle_format(&self, direction: Direction) -> Result<TransferFormat> {
        let engine = self.engine(direction);
        match (engine.state(), engine.format()) {
            (EngineState::Idle, Some(format)) => Ok(*format),
            _ => Err(Error::InvalidState),
        }
    }

    // =========================================================================
    // Consumer API
    // =========================================================================

    /// Service one hardware event of one direction.
    ///
    /// No-op unless the direction is busy.
    pub fn handle_hardware_event(&mut self, direction: Direction) {
        let (engine, port, callback) = self.parts(direction);
        engine.on_hardware_event(port, callback);
    }

    /// Interrupt entry point: services both directions
    pub fn handle_interrupt(&mut self) {
        for direction in Direction::ALL {
            self.handle_hardware_event(direction);
        }
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// State of one direction
    pub fn state(&self, direction: Direction) -> EngineState {
        self.engine(direction).state()
    }

    /// Check if either direction has queued transfers
    pub fn is_busy(&self) -> bool {
        Direction::ALL
            .iter()
            .any(|&d| self.state(d) == EngineState::Busy)
    }

    /// Fault that put a direction in `Error`
    pub fn last_fault(&self, direction: Direction) -> Option<StatusFlags> {
        self.engine(direction).last_fault()
    }

    /// Bytes moved since the last configure or reset, head progress included
    pub fn transferred_count(&self, direction: Direction) -> u64 {
        self.engine(direction).transferred_count()
    }

    /// Number of queued transfers
    pub fn queued(&self, direction: Direction) -> usize {
        self.engine(direction).queue().len()
    }

    /// Bytes moved on the head transfer
    pub fn head_completed(&self, direction: Direction) -> usize {
        self.engine(direction).head_completed()
    }

    /// Transfers fully completed since the last reset
    pub fn completed_transfers(&self, direction: Direction) -> usize {
        self.engine(direction).queue().completed_transfers()
    }

    /// Queue capacity per direction
    pub const fn capacity(&self) -> usize {
        N
    }
}

/// Driver with the default queue depth
pub type SaiDefault<'a, P, C> = Sai<'a, P, C, DEFAULT_QUEUE_SIZE>;

// =============================================================================
// Tests
// =============================================================================
