//! Events whose result the submitting thread waits for.
//!
//! A [`CompletableEvent`] is created on the caller's thread, handed to the
//! background pipeline, and completed there exactly once. The caller then
//! retrieves the outcome with [`get`](CompletableEvent::get), bounded by a
//! [`TimeBudget`].
//!
//! ```
//! use appevent::event::{CompletableEvent, EventKind};
//! use appevent::time::Timer;
//! use std::thread;
//! use std::time::Duration;
//!
//! let event = CompletableEvent::<u64>::new(EventKind::ListOffsets);
//! let producer = event.future().clone();
//! thread::spawn(move || producer.complete(1042));
//!
//! let offset = event.get(&Timer::new(Duration::from_secs(5))).unwrap();
//! assert_eq!(offset, 1042);
//! ```
//!
//! # Failure classification
//!
//! `get` is the only place where failure causes are classified:
//!
//! | Slot / waiter state | `get` returns |
//! |---------------------|---------------|
//! | `Ok(v)` | `Ok(v)` |
//! | `Err(cause)`, cause is an [`Error`] | that error, unchanged |
//! | `Err(cause)`, anything else | [`ErrorKind::Internal`] wrapping `cause` |
//! | thread interrupted | [`ErrorKind::Interrupted`] |
//! | budget exhausted | [`ErrorKind::TimedOut`] |
//!
//! [`ErrorKind::Internal`]: crate::error::ErrorKind::Internal
//! [`ErrorKind::Interrupted`]: crate::error::ErrorKind::Interrupted
//! [`ErrorKind::TimedOut`]: crate::error::ErrorKind::TimedOut

use core::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{EventId, EventKind};
use crate::error::{Cause, Error, Result};
use crate::future::{AsyncResult, Completion, EventFuture, Wait};
use crate::time::TimeBudget;
use crate::tracing_compat::{debug, trace};

/// An application event carrying a one-shot result.
pub struct CompletableEvent<T> {
    id: EventId,
    kind: EventKind,
    future: EventFuture<T>,
}

impl<T> CompletableEvent<T> {
    /// Creates a pending event of the given kind.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        let id = EventId::next();
        trace!(event_id = %id, kind = %kind, "completable event created");
        Self {
            id,
            kind,
            future: EventFuture::new(),
        }
    }

    /// Returns the event's identity.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Returns the event's kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns the result slot, for producers to complete.
    #[must_use]
    pub const fn future(&self) -> &EventFuture<T> {
        &self.future
    }

    /// Returns true once the event has a result.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.future.is_done()
    }
}

impl<T: 'static> CompletableEvent<T> {
    /// Completes the event with `value` unless it is already complete.
    ///
    /// Returns true if this call completed the event.
    #[allow(clippy::must_use_candidate)]
    pub fn complete_success(&self, value: T) -> bool {
        let won = self.future.complete(value);
        self.trace_completion(won, "success");
        won
    }

    /// Completes the event with `cause` unless it is already complete.
    ///
    /// Returns true if this call completed the event.
    #[allow(clippy::must_use_candidate)]
    pub fn complete_failure(&self, cause: Cause) -> bool {
        let won = self.future.complete_exceptionally(cause);
        self.trace_completion(won, "failure");
        won
    }

    /// Completes the event with an owned error value.
    #[allow(clippy::must_use_candidate)]
    pub fn complete_failure_with(&self, err: impl std::error::Error + Send + Sync + 'static) -> bool {
        self.complete_failure(Arc::new(err))
    }

    #[allow(unused_variables)]
    fn trace_completion(&self, won: bool, outcome: &'static str) {
        if won {
            trace!(event_id = %self.id, kind = %self.kind, outcome, "event completed");
        } else {
            debug!(event_id = %self.id, kind = %self.kind, outcome, "late completion ignored");
        }
    }
}

impl<T: Clone + Send + Sync + 'static> CompletableEvent<T> {
    /// Waits for the result for at most what `budget` has left.
    ///
    /// - a value is returned as-is;
    /// - a failure that already is an [`Error`] is returned unchanged;
    /// - any other failure is wrapped as an internal error keeping the cause;
    /// - interruption of the calling thread gives an interrupted error;
    /// - exhaustion of the budget gives a timed-out error and leaves the event
    ///   pending, so it may still complete later.
    ///
    /// A result that is already present wins over a pending interrupt, and a
    /// pending interrupt wins over an exhausted budget.
    pub fn get<B: TimeBudget + ?Sized>(&self, budget: &B) -> Result<T> {
        match self.future.wait(budget) {
            Wait::Ready(Ok(value)) => Ok(value),
            Wait::Ready(Err(cause)) => Err(classify(cause)),
            Wait::Interrupted => Err(Error::interrupted()),
            Wait::TimedOut { waited } => Err(Error::timed_out(waited)),
        }
    }

    /// Completes this event with whatever `source` resolves to.
    ///
    /// Returns immediately. The completion happens on the thread that
    /// resolves `source`, or right here if it is already resolved. Chaining
    /// one event to several sources is the caller's mistake to avoid; the
    /// first source to resolve wins.
    pub fn chain<S: AsyncResult<T> + ?Sized>(&self, source: &S) {
        let target = self.future.clone();
        trace!(event_id = %self.id, kind = %self.kind, "event chained to source");
        source.on_complete(Box::new(move |completion| {
            match completion {
                Ok(value) => target.complete(value),
                Err(cause) => target.complete_exceptionally(cause),
            };
        }));
    }
}

/// Maps a stored failure cause onto the error taxonomy.
fn classify(cause: Cause) -> Error {
    Error::recognize(&cause).unwrap_or_else(|| Error::wrap(cause))
}

impl<T: Clone + Send + Sync + 'static> AsyncResult<T> for CompletableEvent<T> {
    fn on_complete(&self, callback: Box<dyn FnOnce(Completion<T>) + Send + 'static>) {
        self.future.on_complete(callback);
    }
}

impl<T> PartialEq for CompletableEvent<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind && self.future == other.future
    }
}

impl<T> Eq for CompletableEvent<T> {}

impl<T> Hash for CompletableEvent<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.kind.hash(state);
        self.future.hash(state);
    }
}

impl<T> fmt::Display for CompletableEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompletableEvent{{future={}, kind={}}}",
            self.future, self.kind
        )
    }
}

impl<T: fmt::Debug> fmt::Debug for CompletableEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletableEvent")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("future", &self.future)
            .finish()
    }
}
