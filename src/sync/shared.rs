//! ISR-safe SAI wrappers using critical sections.
//!
//! Provides [`SharedSai`] for synchronous ISR-safe access and
//! [`AsyncSharedSai`] for tasks that await queue space or drain completion.

use super::primitives::CriticalSectionCell;
use crate::driver::config::{Direction, EngineState};
use crate::driver::sai::Sai;
use crate::driver::transfer::TransferCallback;
use crate::hal::SaiPort;

#[cfg(feature = "async")]
use super::asynch::{EnqueueFuture, IdleFuture};
#[cfg(feature = "async")]
use super::primitives::AtomicWaker;
#[cfg(feature = "async")]
use crate::driver::transfer::Transfer;

/// ISR-safe SAI wrapper using critical sections.
///
/// All access goes through `critical_section::with()`, disabling interrupts
/// for the duration of the closure, so the interrupt handler never observes
/// a queue with half-updated indices.
///
/// # Example
///
/// ```ignore
/// static SAI: SharedSai<'static, Sai1, fn(TransferEvent<'static>), 4> =
///     SharedSai::new(Sai::new(Sai1::new(), on_transfer));
///
/// SAI.with(|sai| sai.send(Transfer::new(&SAMPLES))).ok();
///
/// #[interrupt]
/// fn SAI1() {
///     SAI.handle_interrupt();
/// }
/// ```
pub struct SharedSai<'a, P, C, const N: usize> {
    inner: CriticalSectionCell<Sai<'a, P, C, N>>,
}

impl<'a, P, C, const N: usize> SharedSai<'a, P, C, N>
where
    P: SaiPort,
    C: TransferCallback<'a>,
{
    /// Wrap a driver (const, suitable for static initialization).
    pub const fn new(sai: Sai<'a, P, C, N>) -> Self {
        Self {
            inner: CriticalSectionCell::new(sai),
        }
    }

    /// Execute a closure with exclusive access to the driver.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Sai<'a, P, C, N>) -> R,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Sai<'a, P, C, N>) -> R,
    {
        self.inner.try_with(f)
    }

    /// Interrupt entry point
    #[inline]
    pub fn handle_interrupt(&self) {
        self.inner.with(Sai::handle_interrupt);
    }

    /// State of one direction
    pub fn state(&self, direction: Direction) -> EngineState {
        self.inner.with_ref(|sai| sai.state(direction))
    }

    /// Unwrap the driver
    pub fn into_inner(self) -> Sai<'a, P, C, N> {
        self.inner.into_inner()
    }
}

/// ISR-safe async-capable SAI wrapper.
///
/// Adds one waker per direction to [`SharedSai`]. The interrupt entry point
/// wakes a direction whenever its state or queue depth changes; so does
/// every [`with`](Self::with) call, since abort, terminate and reset happen
/// there. Only one task should wait on a direction at a time.
///
/// # Example
///
/// ```ignore
/// static SAI: AsyncSharedSai<'static, Sai1, NoCallback, 4> =
///     AsyncSharedSai::new(Sai::new(Sai1::new(), NoCallback));
///
/// async fn stream(blocks: &'static [[u8; 256]]) -> Result<()> {
///     for block in blocks {
///         SAI.send_async(Transfer::new(block)).await.map_err(|e| e.error())?;
///     }
///     SAI.wait_idle(Direction::Transmit).await
/// }
/// ```
#[cfg(feature = "async")]
pub struct AsyncSharedSai<'a, P, C, const N: usize> {
    inner: CriticalSectionCell<Sai<'a, P, C, N>>,
    tx_waker: AtomicWaker,
    rx_waker: AtomicWaker,
}

#[cfg(feature = "async")]
impl<'a, P, C, const N: usize> AsyncSharedSai<'a, P, C, N>
where
    P: SaiPort,
    C: TransferCallback<'a>,
{
    /// Wrap a driver (const, suitable for static initialization).
    pub const fn new(sai: Sai<'a, P, C, N>) -> Self {
        Self {
            inner: CriticalSectionCell::new(sai),
            tx_waker: AtomicWaker::new(),
            rx_waker: AtomicWaker::new(),
        }
    }

    /// Execute a closure with exclusive access to the driver, then wake
    /// both directions' waiters.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Sai<'a, P, C, N>) -> R,
    {
        let result = self.inner.with(f);
        self.tx_waker.wake();
        self.rx_waker.wake();
        result
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Sai<'a, P, C, N>) -> R,
    {
        let result = self.inner.try_with(f);
        if result.is_some() {
            self.tx_waker.wake();
            self.rx_waker.wake();
        }
        result
    }

    /// Interrupt entry point: services both directions and wakes the ones
    /// that made progress.
    pub fn handle_interrupt(&self) {
        for direction in Direction::ALL {
            self.handle_hardware_event(direction);
        }
    }

    /// Service one hardware event and wake the direction's waiter on progress.
    pub fn handle_hardware_event(&self, direction: Direction) {
        let progressed = self.inner.with(|sai| {
            let before = (sai.state(direction), sai.queued(direction));
            sai.handle_hardware_event(direction);
            before != (sai.state(direction), sai.queued(direction))
        });
        if progressed {
            self.waker(direction).wake();
        }
    }

    /// State of one direction
    pub fn state(&self, direction: Direction) -> EngineState {
        self.inner.with_ref(|sai| sai.state(direction))
    }

    /// Wait until a direction has drained its queue.
    ///
    /// Resolves to `Err(Error::HardwareFault(_))` if the direction faults.
    pub fn wait_idle(&self, direction: Direction) -> IdleFuture<'_, 'a, P, C, N> {
        IdleFuture::new(self, direction)
    }

    /// Queue a transfer, waiting for a free slot while the queue is full.
    ///
    /// Other rejections resolve immediately with the descriptor handed back.
    pub fn enqueue_async(
        &self,
        direction: Direction,
        transfer: Transfer<'a>,
    ) -> EnqueueFuture<'_, 'a, P, C, N> {
        EnqueueFuture::new(self, direction, transfer)
    }

    /// Queue a buffer for transmission, waiting for a free slot
    pub fn send_async(&self, transfer: Transfer<'a>) -> EnqueueFuture<'_, 'a, P, C, N> {
        self.enqueue_async(Direction::Transmit, transfer)
    }

    /// Queue a writable buffer for reception, waiting for a free slot
    pub fn receive_async(&self, transfer: Transfer<'a>) -> EnqueueFuture<'_, 'a, P, C, N> {
        self.enqueue_async(Direction::Receive, transfer)
    }

    /// Access the driver without waking anyone
    pub(crate) fn with_quiet<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Sai<'a, P, C, N>) -> R,
    {
        self.inner.with(f)
    }

    pub(crate) fn waker(&self, direction: Direction) -> &AtomicWaker {
        match direction {
            Direction::Transmit => &self.tx_waker,
            Direction::Receive => &self.rx_waker,
        }
    }
}
