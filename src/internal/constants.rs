//! Centralized Constants
//!
//! This module provides a single source of truth for the limits, defaults and
//! flag bits used throughout the SAI driver.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **FIFO / queue sizes**: hardware FIFO depth, transfer queue depth
//! - **Format limits**: word widths, data lines
//! - **Timing**: blocking-transfer polling interval and timeout
//! - **Flag bits**: TCSR/RCSR status and request-enable bits
//!
//! # Note
//!
//! Only the status and request-enable bits are described here. The rest of
//! the register map belongs to the hardware port implementation.

// =============================================================================
// FIFO and Queue Sizes
// =============================================================================

/// Depth of the per-data-line transmit/receive FIFO, in words
pub const FIFO_DEPTH: usize = 32;

/// Default FIFO watermark, in words (half the FIFO)
pub const DEFAULT_WATERMARK: usize = FIFO_DEPTH / 2;

/// Default number of queued transfers per direction
pub const DEFAULT_QUEUE_SIZE: usize = 4;

// =============================================================================
// Format Limits
// =============================================================================

/// Number of data lines (channels) a transceiver can drive
pub const MAX_DATA_LINES: usize = 8;

/// Size of the FIFO data register, in bytes
pub const DATA_REGISTER_BYTES: usize = 4;

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 48_000;

// =============================================================================
// Timing Constants
// =============================================================================

/// Polling interval for blocking transfers in microseconds
pub const BLOCKING_POLL_INTERVAL_US: u32 = 10;

/// Default timeout for one blocking transfer in microseconds
pub const DEFAULT_BLOCKING_TIMEOUT_US: u32 = 100_000;

// =============================================================================
// Status Flag Bits (TCSR / RCSR)
// =============================================================================

/// FIFO request flag: FIFO below (TX) / above (RX) the watermark
pub const CSR_FRF: u32 = 1 << 16;

/// FIFO warning flag: FIFO empty (TX) / full (RX)
pub const CSR_FWF: u32 = 1 << 17;

/// FIFO error flag: underrun (TX) / overrun (RX), write-1-to-clear
pub const CSR_FEF: u32 = 1 << 18;

/// Sync error flag: unexpected frame sync, write-1-to-clear
pub const CSR_SEF: u32 = 1 << 19;

/// Word start flag: start of the configured word, write-1-to-clear
pub const CSR_WSF: u32 = 1 << 20;

/// Status bits that are cleared by writing one
pub const CSR_W1C_MASK: u32 = CSR_FEF | CSR_SEF | CSR_WSF;

// =============================================================================
// Request Enable Bits (TCSR / RCSR)
// =============================================================================

/// FIFO request DMA enable
pub const CSR_FRDE: u32 = 1 << 0;

/// FIFO warning DMA enable
pub const CSR_FWDE: u32 = 1 << 1;

/// FIFO request interrupt enable
pub const CSR_FRIE: u32 = 1 << 8;

/// FIFO warning interrupt enable
pub const CSR_FWIE: u32 = 1 << 9;

/// FIFO error interrupt enable
pub const CSR_FEIE: u32 = 1 << 10;

/// Sync error interrupt enable
pub const CSR_SEIE: u32 = 1 << 11;

/// Word start interrupt enable
pub const CSR_WSIE: u32 = 1 << 12;
