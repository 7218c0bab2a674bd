//! Core driver components for the SAI transfer queue.
//!
//! This module contains the building blocks of the queued transfer driver:
//!
//! - [`config`] - Directions, word widths, channel masks and the transfer format
//! - [`error`] - Error types and result aliases
//! - [`interrupt`] - Status flags and interrupt/DMA request enables
//! - [`transfer`] - Transfer descriptors, events and callbacks
//! - [`queue`] - Fixed-capacity circular transfer queue
//! - [`engine`] - Per-direction transfer state machine
//! - [`sai`] - The driver handle tying both directions to one port
//!
//! # Example
//!
//! ```ignore
//! use ph_imx_sai::driver::{ChannelMask, TransferFormat, WordWidth};
//!
//! let format = TransferFormat::new()
//!     .with_word_width(WordWidth::Bits24)
//!     .with_channel_mask(ChannelMask::CHANNEL0 | ChannelMask::CHANNEL1);
//! ```

// Submodules
pub mod config;
pub mod engine;
pub mod error;
pub mod interrupt;
pub mod queue;
pub mod sai;
pub mod transfer;

// Re-exports for convenience
pub use config::{ChannelMask, Direction, EngineState, TransferFormat, TransferMode, WordWidth};
pub use engine::TransferEngine;
pub use error::{ConfigError, ConfigResult, Error, Result};
pub use interrupt::{InterruptEnable, StatusFlags};
pub use queue::TransferQueue;
pub use sai::{Sai, SaiDefault};
pub use transfer::{
    EnqueueError, NoCallback, Transfer, TransferCallback, TransferEvent, TransferStatus,
};
