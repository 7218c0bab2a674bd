//! Async/await support for SAI transfers.
//!
//! Futures returned by [`AsyncSharedSai`]. Both register the direction's
//! waker before checking the driver, so a completion that lands between the
//! check and the `Pending` return still wakes the task.

use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use super::shared::AsyncSharedSai;
use crate::driver::config::{Direction, EngineState};
use crate::driver::error::{Error, Result};
use crate::driver::transfer::{EnqueueError, Transfer, TransferCallback};
use crate::hal::SaiPort;

/// Future resolving once a direction is no longer busy.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct IdleFuture<'s, 'a, P, C, const N: usize> {
    shared: &'s AsyncSharedSai<'a, P, C, N>,
    direction: Direction,
}

impl<'s, 'a, P, C, const N: usize> IdleFuture<'s, 'a, P, C, N> {
    /// Create a new idle future.
    pub fn new(shared: &'s AsyncSharedSai<'a, P, C, N>, direction: Direction) -> Self {
        Self { shared, direction }
    }
}

impl<'a, P, C, const N: usize> Future for IdleFuture<'_, 'a, P, C, N>
where
    P: SaiPort,
    C: TransferCallback<'a>,
{
    type Output = Result<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        this.shared.waker(this.direction).register(cx.waker());

        let (state, fault) = this
            .shared
            .with_quiet(|sai| (sai.state(this.direction), sai.last_fault(this.direction)));
        match state {
            EngineState::Busy => Poll::Pending,
            EngineState::Idle => Poll::Ready(Ok(())),
            EngineState::Error => Poll::Ready(Err(Error::HardwareFault(fault.unwrap_or_default()))),
        }
    }
}

/// Future queueing one transfer once the queue has room.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct EnqueueFuture<'s, 'a, P, C, const N: usize> {
    shared: &'s AsyncSharedSai<'a, P, C, N>,
    direction: Direction,
    transfer: Option<Transfer<'a>>,
}

impl<'s, 'a, P, C, const N: usize> EnqueueFuture<'s, 'a, P, C, N> {
    /// Create a new enqueue future.
    pub fn new(
        shared: &'s AsyncSharedSai<'a, P, C, N>,
        direction: Direction,
        transfer: Transfer<'a>,
    ) -> Self {
        Self {
            shared,
            direction,
            transfer: Some(transfer),
        }
    }
}

impl<'a, P, C, const N: usize> Future for EnqueueFuture<'_, 'a, P, C, N>
where
    P: SaiPort,
    C: TransferCallback<'a>,
{
    type Output = core::result::Result<(), EnqueueError<'a>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        // Polled again after completion
        let Some(transfer) = this.transfer.take() else {
            return Poll::Ready(Ok(()));
        };
        this.shared.waker(this.direction).register(cx.waker());

        let direction = this.direction;
        match this.shared.with_quiet(|sai| sai.enqueue(direction, transfer)) {
            Ok(()) => Poll::Ready(Ok(())),
            Err(e) if e.error() == Error::QueueFull => {
                this.transfer = Some(e.into_transfer());
                Poll::Pending
            }
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}
