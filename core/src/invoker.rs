//! Binding a handler to one input as a single unit of work.
//!
//! Each unit carries the slot it was bound to before anything runs, so a
//! batch can be reassembled in dispatch order regardless of which unit
//! finishes first.

use std::any::Any;
use std::future::ready;
use std::panic::{AssertUnwindSafe, catch_unwind};

use futures_util::future::FutureExt;

use fanout_types::{ExtraArgs, HandlerError, UnitOutcome};

use crate::handler::{Handler, HandlerFut};

/// A handler call bound to its input and slot, not yet polled.
pub struct Unit<'a, R> {
    slot: usize,
    future: HandlerFut<'a, R>,
}

/// A unit that has run to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled<R> {
    pub slot: usize,
    pub outcome: UnitOutcome<R>,
}

/// Bind `handler` to `input` and the run's extra args.
///
/// A handler that panics while building its future is captured here and
/// settles as [`HandlerError::Panicked`].
pub fn bind<'a, I, H>(slot: usize, handler: &'a H, input: I, extra: &ExtraArgs) -> Unit<'a, H::Output>
where
    I: 'a,
    H: Handler<I> + ?Sized,
{
    let extra = extra.clone();
    let future = match catch_unwind(AssertUnwindSafe(|| handler.call(input, extra))) {
        Ok(future) => future,
        Err(payload) => {
            let err = panicked(handler.name(), &payload);
            Box::pin(ready(Err(err)))
        }
    };
    Unit { slot, future }
}

impl<R> Unit<'_, R> {
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }

    /// Drive the handler to completion. Panics while polling are captured
    /// as [`HandlerError::Panicked`] instead of unwinding into the runner.
    pub async fn settle(self) -> Settled<R> {
        let outcome = match AssertUnwindSafe(self.future).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => Err(HandlerError::Panicked {
                message: panic_payload_to_string(&payload),
            }),
        };
        Settled {
            slot: self.slot,
            outcome,
        }
    }
}

fn panicked(handler: &str, payload: &Box<dyn Any + Send>) -> HandlerError {
    let message = panic_payload_to_string(payload);
    tracing::debug!(handler, %message, "Handler panicked before returning a future");
    HandlerError::Panicked { message }
}

fn panic_payload_to_string(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
