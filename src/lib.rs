//! i.MX SAI Transfer Driver
//!
//! A `no_std`, `no_alloc` driver core for the Synchronous Audio Interface (SAI)
//! found on i.MX RT and i.MX 8 parts.
//!
//! The hard part of an audio driver is not the registers but the queue: the
//! application keeps several buffers in flight per direction while one
//! interrupt (or DMA completion) drains them in order. This crate provides
//! that queue, the per-direction state machine around it, and a thin handle
//! tying both directions to one hardware port.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Driver Layer** ([`driver`]): Transfer descriptors, the circular queue,
//!    the per-direction [`TransferEngine`] and the [`Sai`] handle
//! 2. **HAL Layer** ([`hal`]): The [`SaiPort`] register boundary and polled
//!    blocking I/O
//! 3. **Sync Layer** ([`sync`]): Critical-section wrappers for sharing the
//!    handle with the interrupt handler, plus async futures
//!
//! ## Transfer Lifecycle
//!
//! Each direction is `Idle`, `Busy` or `Error`:
//!
//! - The first enqueue on an idle direction arms the port's request lines.
//! - Every hardware event moves one unit (one word per data line, or one
//!   watermark block in DMA mode) into or out of the head buffer.
//! - A finished buffer is handed back through the callback; when the queue
//!   empties the request lines are disarmed.
//! - A FIFO or sync error flushes the queue, reports the in-flight buffer
//!   once, and parks the direction in `Error` until [`Sai::reset`].
//!
//! # Features
//!
//! - `critical-section` (default): Enable ISR-safe `SharedSai` wrapper
//! - `async`: Enable async/await support with wakers
//! - `defmt`: Enable defmt formatting and lifecycle logging
//! - `log`: Enable `log` warnings on faults and rejected enqueues
//!
//! # Example
//!
//! ```ignore
//! use ph_imx_sai::{Direction, Sai, Transfer, TransferEvent, TransferFormat, WordWidth};
//!
//! fn on_transfer(event: TransferEvent<'static>) {
//!     // refill or recycle event.transfer
//! }
//!
//! let mut sai: Sai<'static, _, _, 4> = Sai::new(Sai1::new(), on_transfer);
//!
//! sai.configure(
//!     Direction::Transmit,
//!     TransferFormat::new()
//!         .with_sample_rate(48_000)
//!         .with_word_width(WordWidth::Bits16),
//! )?;
//!
//! static PING: [u8; 512] = [0; 512];
//! static PONG: [u8; 512] = [0; 512];
//! sai.send(Transfer::new(&PING)).map_err(|e| e.error())?;
//! sai.send(Transfer::new(&PONG)).map_err(|e| e.error())?;
//!
//! // From the SAI interrupt:
//! sai.handle_interrupt();
//! ```
//!
//! # Memory Requirements
//!
//! No allocation. Each direction holds `N` descriptor slots of three words
//! plus a flag; the buffers themselves are borrowed from the caller.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels mirror the [lints] tables in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{
    ChannelMask, Direction, EngineState, TransferFormat, TransferMode, WordWidth,
};
pub use driver::engine::TransferEngine;
pub use driver::error::{ConfigError, ConfigResult, Error, Result};
pub use driver::interrupt::{InterruptEnable, StatusFlags};
pub use driver::queue::TransferQueue;
pub use driver::sai::{Sai, SaiDefault};
pub use driver::transfer::{
    EnqueueError, NoCallback, Transfer, TransferCallback, TransferEvent, TransferStatus,
};
pub use hal::{BlockingTransfer, PortResult, SaiPort};

/// Hardware limits and defaults.
pub mod constants {
    pub use crate::internal::constants::{
        DEFAULT_BLOCKING_TIMEOUT_US, DEFAULT_QUEUE_SIZE, DEFAULT_SAMPLE_RATE_HZ,
        DEFAULT_WATERMARK, FIFO_DEPTH, MAX_DATA_LINES,
    };
}

/// Status and request-enable bits of the transmit/receive control registers.
///
/// For [`SaiPort`] implementations that translate [`StatusFlags`] and
/// [`InterruptEnable`] to register writes by hand.
pub mod register_bits {
    pub use crate::internal::constants::{
        CSR_FEF, CSR_FEIE, CSR_FRDE, CSR_FRF, CSR_FRIE, CSR_FWDE, CSR_FWF, CSR_FWIE, CSR_SEF,
        CSR_SEIE, CSR_W1C_MASK, CSR_WSF, CSR_WSIE,
    };
}

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedSai};

#[cfg(feature = "async")]
pub use sync::AsyncSharedSai;
