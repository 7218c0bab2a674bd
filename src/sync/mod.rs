//! Synchronization and Concurrency Support
//!
//! Synchronization primitives and interrupt-safe wrappers for sharing one
//! [`Sai`](crate::Sai) handle between application code and its interrupt
//! handler:
//!
//! - **Primitives** (`primitives`): Low-level synchronization types
//!   - [`CriticalSectionCell`] - ISR-safe interior mutability
//!   - [`AtomicWaker`] - Async waker storage for interrupts (`async`)
//!
//! - **Shared Wrappers** (`shared`): ISR-safe SAI wrappers
//!   - [`SharedSai`] - Synchronous critical-section protected driver
//!   - [`AsyncSharedSai`] - Driver with per-direction wakers (`async`)
//!
//! - **Async Support** (`asynch`): [`IdleFuture`] and [`EnqueueFuture`]
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables `primitives` and `shared` modules
//! - `async`: Enables wakers, `AsyncSharedSai` and the `asynch` module
//!
//! # Example
//!
//! ```ignore
//! use ph_imx_sai::sync::SharedSai;
//!
//! static SAI: SharedSai<'static, Sai1, fn(TransferEvent<'static>), 4> =
//!     SharedSai::new(Sai::new(Sai1::new(), on_transfer));
//!
//! fn main() {
//!     SAI.with(|sai| sai.configure(Direction::Transmit, TransferFormat::new())).unwrap();
//! }
//!
//! #[interrupt]
//! fn SAI1() {
//!     SAI.handle_interrupt();
//! }
//! ```

mod primitives;

pub use primitives::CriticalSectionCell;

#[cfg(feature = "async")]
pub use primitives::AtomicWaker;

mod shared;

pub use shared::SharedSai;

#[cfg(feature = "async")]
pub use shared::AsyncSharedSai;

#[cfg(feature = "async")]
pub mod asynch;

#[cfg(feature = "async")]
pub use asynch::{EnqueueFuture, IdleFuture};

#[cfg(all(test, feature = "async"))]
mod test_waker;
