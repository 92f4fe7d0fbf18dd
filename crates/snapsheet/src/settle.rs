//! Futures returned by sheet commands.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// How a command's animation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettleOutcome {
    /// The animation reached its target.
    Completed,
    /// A touch, a newer command or disposal superseded it.
    Cancelled,
    /// The sheet was not laid out, or had been disposed, so nothing ran.
    Skipped,
}

#[derive(Default)]
struct SettleSlot {
    outcome: Option<SettleOutcome>,
    waker: Option<Waker>,
}

/// Resolves when the animation started by a command settles.
///
/// Dropping the future does not cancel the animation. Clones observe the
/// same outcome.
#[derive(Clone)]
pub struct Settle {
    slot: Rc<RefCell<SettleSlot>>,
}

impl Settle {
    pub(crate) fn pending() -> (Settle, SettleSignal) {
        let slot = Rc::new(RefCell::new(SettleSlot::default()));
        (
            Settle {
                slot: Rc::clone(&slot),
            },
            SettleSignal { slot: Some(slot) },
        )
    }

    pub fn ready(outcome: SettleOutcome) -> Settle {
        Settle {
            slot: Rc::new(RefCell::new(SettleSlot {
                outcome: Some(outcome),
                waker: None,
            })),
        }
    }

    pub fn skipped() -> Settle {
        Self::ready(SettleOutcome::Skipped)
    }

    /// The outcome, once resolved.
    pub fn outcome(&self) -> Option<SettleOutcome> {
        self.slot.borrow().outcome
    }

    pub fn is_settled(&self) -> bool {
        self.outcome().is_some()
    }
}

impl Future for Settle {
    type Output = SettleOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match slot.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl std::fmt::Debug for Settle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settle")
            .field("outcome", &self.outcome())
            .finish()
    }
}

/// Resolving half of a [`Settle`]. Dropping it unresolved cancels.
pub(crate) struct SettleSignal {
    slot: Option<Rc<RefCell<SettleSlot>>>,
}

impl SettleSignal {
    pub(crate) fn resolve(mut self, outcome: SettleOutcome) {
        self.finish(outcome);
    }

    fn finish(&mut self, outcome: SettleOutcome) {
        let Some(slot) = self.slot.take() else {
            return;
        };
        let waker = {
            let mut slot = slot.borrow_mut();
            slot.outcome = Some(outcome);
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl Drop for SettleSignal {
    fn drop(&mut self) {
        self.finish(SettleOutcome::Cancelled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_task::noop_waker_ref;

    fn poll(settle: &mut Settle) -> Poll<SettleOutcome> {
        let mut cx = Context::from_waker(noop_waker_ref());
        Pin::new(settle).poll(&mut cx)
    }

    #[test]
    fn pending_until_resolved() {
        let (mut settle, signal) = Settle::pending();
        assert_eq!(poll(&mut settle), Poll::Pending);
        signal.resolve(SettleOutcome::Completed);
        assert_eq!(poll(&mut settle), Poll::Ready(SettleOutcome::Completed));
    }

    #[test]
    fn dropped_signal_cancels() {
        let (settle, signal) = Settle::pending();
        let observer = settle.clone();
        drop(signal);
        assert_eq!(observer.outcome(), Some(SettleOutcome::Cancelled));
    }

    #[test]
    fn ready_is_immediately_settled() {
        let mut settle = Settle::skipped();
        assert!(settle.is_settled());
        assert_eq!(poll(&mut settle), Poll::Ready(SettleOutcome::Skipped));
    }
}
