//! Hardware Abstraction Layer
//!
//! This module holds the boundary between the transfer engine and the SAI
//! registers, plus helpers that drive the FIFOs directly.
//!
//! # Modules
//!
//! - [`port`]: The [`SaiPort`] trait implemented over the register block
//! - [`blocking`]: Polled FIFO reads and writes with a timeout
//!
//! # Delay Integration
//!
//! All types that require delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod blocking;
pub mod port;

// Re-export commonly used types
pub use blocking::BlockingTransfer;
pub use port::{PortResult, SaiPort};
