//! Status and request-enable flags for one SAI transceiver.
//!
//! This module provides [`StatusFlags`], parsed from the transmit/receive
//! control register, and [`InterruptEnable`], the set of interrupt and DMA
//! request lines the transfer engine arms. Both are plain value types handed
//! to and from the [`SaiPort`](crate::hal::SaiPort).

use super::config::TransferMode;
use crate::internal::constants::{
    CSR_FEF, CSR_FEIE, CSR_FRDE, CSR_FRF, CSR_FRIE, CSR_FWDE, CSR_FWF, CSR_FWIE, CSR_SEF,
    CSR_SEIE, CSR_W1C_MASK, CSR_WSF, CSR_WSIE,
};

// =============================================================================
// Status Flags
// =============================================================================

/// Status flags of one transceiver.
///
/// # Example
///
/// ```ignore
/// let status = port.status_flags(Direction::Transmit);
/// if status.fifo_request {
///     // FIFO has room for at least one watermark of words
/// }
/// if status.has_fault() {
///     port.clear_fault_flags(Direction::Transmit, status.faults());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags {
    /// Word start - start of the configured data word detected
    pub word_start: bool,
    /// Sync error - frame sync asserted before the frame ended
    pub sync_error: bool,
    /// FIFO error - transmit underrun or receive overrun
    pub fifo_error: bool,
    /// FIFO request - FIFO crossed the watermark
    pub fifo_request: bool,
    /// FIFO warning - transmit FIFO empty or receive FIFO full
    pub fifo_warning: bool,
}

impl StatusFlags {
    /// Create from raw control register value
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            word_start: (raw & CSR_WSF) != 0,
            sync_error: (raw & CSR_SEF) != 0,
            fifo_error: (raw & CSR_FEF) != 0,
            fifo_request: (raw & CSR_FRF) != 0,
            fifo_warning: (raw & CSR_FWF) != 0,
        }
    }

    /// Convert to raw register bits
    #[inline]
    pub const fn to_raw(&self) -> u32 {
        let mut val = 0u32;
        if self.word_start {
            val |= CSR_WSF;
        }
        if self.sync_error {
            val |= CSR_SEF;
        }
        if self.fifo_error {
            val |= CSR_FEF;
        }
        if self.fifo_request {
            val |= CSR_FRF;
        }
        if self.fifo_warning {
            val |= CSR_FWF;
        }
        val
    }

    /// Raw bits suitable for a write-1-to-clear access.
    ///
    /// Request and warning flags are level-sensitive and cannot be cleared.
    #[inline]
    pub const fn to_clear_mask(&self) -> u32 {
        self.to_raw() & CSR_W1C_MASK
    }

    /// Check if any flag is set
    #[inline]
    pub const fn any(&self) -> bool {
        self.word_start || self.sync_error || self.fifo_error || self.fifo_request || self.fifo_warning
    }

    /// Check if a fault (FIFO error or sync error) is flagged
    #[inline]
    pub const fn has_fault(&self) -> bool {
        self.sync_error || self.fifo_error
    }

    /// Keep only the fault flags
    #[inline]
    pub const fn faults(&self) -> Self {
        Self {
            sync_error: self.sync_error,
            fifo_error: self.fifo_error,
            ..Self::empty()
        }
    }

    /// No flag set
    #[inline]
    pub const fn empty() -> Self {
        Self {
            word_start: false,
            sync_error: false,
            fifo_error: false,
            fifo_request: false,
            fifo_warning: false,
        }
    }
}

// =============================================================================
// Interrupt / DMA Request Enables
// =============================================================================

/// Interrupt and DMA request lines of one transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptEnable {
    /// Word start interrupt
    pub word_start: bool,
    /// Sync error interrupt
    pub sync_error: bool,
    /// FIFO error interrupt
    pub fifo_error: bool,
    /// FIFO request interrupt
    pub fifo_request: bool,
    /// FIFO warning interrupt
    pub fifo_warning: bool,
    /// FIFO request DMA
    pub fifo_request_dma: bool,
    /// FIFO warning DMA
    pub fifo_warning_dma: bool,
}

impl InterruptEnable {
    /// Request lines armed while a direction drains its queue.
    ///
    /// Error interrupts are always enabled so that faults reach the event
    /// handler; data requests go to the CPU or the DMA depending on `mode`.
    #[must_use]
    pub const fn for_mode(mode: TransferMode) -> Self {
        let dma = matches!(mode, TransferMode::Dma);
        Self {
            word_start: false,
            sync_error: true,
            fifo_error: true,
            fifo_request: !dma,
            fifo_warning: false,
            fifo_request_dma: dma,
            fifo_warning_dma: false,
        }
    }

    /// Create from raw control register value
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            word_start: (raw & CSR_WSIE) != 0,
            sync_error: (raw & CSR_SEIE) != 0,
            fifo_error: (raw & CSR_FEIE) != 0,
            fifo_request: (raw & CSR_FRIE) != 0,
            fifo_warning: (raw & CSR_FWIE) != 0,
            fifo_request_dma: (raw & CSR_FRDE) != 0,
            fifo_warning_dma: (raw & CSR_FWDE) != 0,
        }
    }

    /// Convert to raw register bits
    #[inline]
    pub const fn to_raw(&self) -> u32 {
        let mut val = 0u32;
        if self.word_start {
            val |= CSR_WSIE;
        }
        if self.sync_error {
            val |= CSR_SEIE;
        }
        if self.fifo_error {
            val |= CSR_FEIE;
        }
        if self.fifo_request {
            val |= CSR_FRIE;
        }
        if self.fifo_warning {
            val |= CSR_FWIE;
        }
        if self.fifo_request_dma {
            val |= CSR_FRDE;
        }
        if self.fifo_warning_dma {
            val |= CSR_FWDE;
        }
        val
    }

    /// Check if any line is enabled
    #[inline]
    pub const fn any(&self) -> bool {
        self.to_raw() != 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
