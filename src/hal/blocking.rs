//! Blocking FIFO I/O
//!
//! Polled transfers that bypass the queue: the caller spins on the FIFO
//! request flag, pushing or popping one watermark-sized burst each time it is
//! set. Intended for bring-up, tests and short configuration sequences.

use embedded_hal::delay::DelayNs;

use super::port::SaiPort;
use crate::driver::config::{Direction, TransferFormat};
use crate::driver::error::{Error, Result};
use crate::driver::interrupt::StatusFlags;
use crate::internal::constants::{BLOCKING_POLL_INTERVAL_US, DEFAULT_BLOCKING_TIMEOUT_US, FIFO_DEPTH};
use crate::internal::word;

// =============================================================================
// Blocking Transfer
// =============================================================================

/// Polled FIFO writer/reader.
///
/// Each burst waits at most the configured timeout for the request flag.
#[derive(Debug)]
pub struct BlockingTransfer<D: DelayNs> {
    /// Delay provider
    delay: D,
    /// Wait timeout per burst in microseconds
    timeout_us: u32,
}

impl<D: DelayNs> BlockingTransfer<D> {
    /// Create a blocking transfer helper with the default timeout
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            timeout_us: DEFAULT_BLOCKING_TIMEOUT_US,
        }
    }

    /// Create a blocking transfer helper with a custom per-burst timeout
    pub fn with_timeout(delay: D, timeout_us: u32) -> Self {
        Self { delay, timeout_us }
    }

    /// Get the current timeout setting
    pub fn timeout_us(&self) -> u32 {
        self.timeout_us
    }

    /// Write `data` to the transmit FIFO.
    ///
    /// Returns `Err(Error::Timeout)` if the FIFO stops requesting data and
    /// `Err(Error::HardwareFault(_))` if the port latches a fault.
    pub fn write<P: SaiPort>(&mut self, port: &mut P, format: &TransferFormat, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::InvalidArgument);
        }
        let bytes_per_word = format.bytes_per_word();
        let lines = format.channel_count();
        // Free slots per line once the request flag is set
        let burst = FIFO_DEPTH.saturating_sub(format.watermark).max(1) * lines;

        let mut words = data.chunks(bytes_per_word).enumerate().peekable();
        while words.peek().is_some() {
            self.wait_for_request(port, Direction::Transmit)?;
            for (index, chunk) in words.by_ref().take(burst) {
                let channel = format.channel_mask.nth(index % lines).unwrap_or(0);
                port.write_word(channel, word::pack(chunk))
                    .map_err(|flags| fault(port, Direction::Transmit, flags))?;
            }
        }
        Ok(())
    }

    /// Fill `buffer` from the receive FIFO.
    ///
    /// Same error behavior as [`write`](Self::write).
    pub fn read<P: SaiPort>(&mut self, port: &mut P, format: &TransferFormat, buffer: &mut [u8]) -> Result<()> {
        if buffer.is_empty() {
            return Err(Error::InvalidArgument);
        }
        let bytes_per_word = format.bytes_per_word();
        let lines = format.channel_count();
        let burst = format.watermark.max(1) * lines;

        let mut words = buffer.chunks_mut(bytes_per_word).enumerate().peekable();
        while words.peek().is_some() {
            self.wait_for_request(port, Direction::Receive)?;
            for (index, chunk) in words.by_ref().take(burst) {
                let channel = format.channel_mask.nth(index % lines).unwrap_or(0);
                let value = port
                    .read_word(channel)
                    .map_err(|flags| fault(port, Direction::Receive, flags))?;
                word::unpack(value, chunk);
            }
        }
        Ok(())
    }

    /// Poll until the FIFO request flag of `direction` is set.
    fn wait_for_request<P: SaiPort>(&mut self, port: &mut P, direction: Direction) -> Result<()> {
        let max_iterations = (self.timeout_us / BLOCKING_POLL_INTERVAL_US).max(1);
        for _ in 0..max_iterations {
            let flags = port.status_flags(direction);
            if flags.has_fault() {
                return Err(fault(port, direction, flags.faults()));
            }
            if flags.fifo_request {
                return Ok(());
            }
            self.delay.delay_us(BLOCKING_POLL_INTERVAL_US);
        }

        Err(Error::Timeout)
    }
}

/// Clear latched fault flags and turn them into an error.
fn fault<P: SaiPort>(port: &mut P, direction: Direction, flags: StatusFlags) -> Error {
    port.clear_fault_flags(direction, flags);
    #[cfg(feature = "log")]
    log::warn!("SAI {:?} blocking transfer fault: {:#010x}", direction, flags.to_raw());
    Error::HardwareFault(flags)
}

// =============================================================================
// Tests
// =============================================================================
