//! One-shot result slot shared between a producer and any number of readers.
//!
//! [`EventFuture`] holds exactly one of: nothing yet, a value, or a failure
//! cause. The first completion wins; later ones are ignored.
//!
//! ```text
//!   producer thread                 slot                  reader threads
//!        │                           │                          │
//!        │── complete(v) ───────────►│ Pending → Settled(Ok v)  │
//!        │                           │── notify_all ───────────►│ wait() → Ready
//!        │                           │── listeners(&Ok v)       │
//!        │── complete(w) ───────────►│ (already settled: no-op) │
//! ```
//!
//! # Ordering
//!
//! The settled value is published through a [`OnceLock`], so every reader
//! that observes it observes it fully written. The transition is made while
//! holding the waiter lock, which is what lets listener registration and
//! blocking waits check for completion without missing it.
//!
//! Listeners run on the completing thread after the lock is released, so a
//! listener may freely touch the same slot again.
//!
//! # Listener dispatch
//!
//! A completion made from inside a running listener (a chained event, for
//! instance) settles its slot and wakes its waiters at once, but only queues
//! its listeners. The outermost completion on the thread drains that queue,
//! so a chain of any length runs in constant stack depth.
//!
//! A panicking listener does not stop the others. Every queued listener
//! runs, and the first panic is resumed afterwards from the outermost
//! `complete`.

use core::fmt;
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use crate::error::Cause;
use crate::interrupt::{Parked, Unpark};
use crate::time::TimeBudget;
use crate::tracing_compat::{debug, trace};

/// The settled content of a result slot.
pub type Completion<T> = Result<T, Cause>;

type Listener<T> = Box<dyn FnOnce(&Completion<T>) + Send + 'static>;

type Job = Box<dyn FnOnce()>;

thread_local! {
    /// Listener jobs of the dispatch running on this thread, if any.
    static DISPATCH: RefCell<Option<VecDeque<Job>>> = const { RefCell::new(None) };
}

/// Runs `jobs` on the calling thread, or queues them behind the dispatch
/// already running here.
fn dispatch(jobs: impl Iterator<Item = Job>) {
    let nested = DISPATCH.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(queue) = slot.as_mut() {
            queue.extend(jobs);
            true
        } else {
            *slot = Some(jobs.collect());
            false
        }
    });
    if nested {
        return;
    }

    let mut first_panic: Option<Box<dyn Any + Send>> = None;
    while let Some(job) = next_job() {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            debug!("listener panicked; running the remaining listeners");
            first_panic.get_or_insert(payload);
        }
    }
    DISPATCH.with(|slot| slot.borrow_mut().take());

    if let Some(payload) = first_panic {
        panic::resume_unwind(payload);
    }
}

fn next_job() -> Option<Job> {
    DISPATCH.with(|slot| slot.borrow_mut().as_mut().and_then(VecDeque::pop_front))
}

/// Outcome of a bounded wait on a slot.
///
/// This is the raw result of waiting; it does not classify failure causes.
#[derive(Debug)]
pub enum Wait<T> {
    /// The slot was (or became) settled.
    Ready(Completion<T>),
    /// The waiting thread was interrupted before the slot settled.
    Interrupted,
    /// The budget ran out before the slot settled.
    TimedOut {
        /// How long the wait actually blocked.
        waited: Duration,
    },
}

/// A source of a single asynchronous result that others can subscribe to.
///
/// The callback runs exactly once, on whichever thread resolves the source
/// (or on the registering thread if the source is already resolved).
pub trait AsyncResult<T> {
    /// Registers `callback` to receive the outcome.
    fn on_complete(&self, callback: Box<dyn FnOnce(Completion<T>) + Send + 'static>);
}

struct Inner<T> {
    result: OnceLock<Completion<T>>,
    /// Listeners waiting for the result. Guards the settle transition.
    listeners: Mutex<Vec<Listener<T>>>,
    cond: Condvar,
}

impl<T: Send + Sync> Unpark for Inner<T> {
    fn unpark(&self) {
        let _guard = self.listeners.lock();
        self.cond.notify_all();
    }
}

/// A cloneable handle to one shared result slot.
///
/// Clones refer to the same slot; two handles are equal only if they do.
pub struct EventFuture<T> {
    inner: Arc<Inner<T>>,
}

impl<T> EventFuture<T> {
    /// Creates a new, unsettled slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                result: OnceLock::new(),
                listeners: Mutex::new(Vec::new()),
                cond: Condvar::new(),
            }),
        }
    }

    /// Returns true once the slot is settled.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.inner.result.get().is_some()
    }

    /// Returns true if the slot is settled with a failure.
    #[must_use]
    pub fn is_completed_exceptionally(&self) -> bool {
        matches!(self.inner.result.get(), Some(Err(_)))
    }

    /// Borrows the settled outcome without blocking.
    #[must_use]
    pub fn result(&self) -> Option<&Completion<T>> {
        self.inner.result.get()
    }

    /// Registers a one-shot listener for the outcome.
    ///
    /// Runs immediately on the calling thread if the slot is already settled.
    pub fn when_complete<F>(&self, listener: F)
    where
        F: FnOnce(&Completion<T>) + Send + 'static,
    {
        {
            let mut listeners = self.inner.listeners.lock();
            if self.inner.result.get().is_none() {
                listeners.push(Box::new(listener));
                return;
            }
        }
        if let Some(completion) = self.inner.result.get() {
            listener(completion);
        }
    }
}

impl<T: 'static> EventFuture<T> {
    /// Creates a slot already settled with `value`.
    #[must_use]
    pub fn completed(value: T) -> Self {
        let future = Self::new();
        future.settle(Ok(value));
        future
    }

    /// Settles the slot with `value` if it is not settled yet.
    ///
    /// Returns true if this call settled the slot.
    ///
    /// # Panics
    ///
    /// Resumes the first listener panic, after every listener has run and
    /// with the slot already settled.
    #[allow(clippy::must_use_candidate)]
    pub fn complete(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settles the slot with `cause` if it is not settled yet.
    ///
    /// Returns true if this call settled the slot. Panics like
    /// [`complete`](Self::complete).
    #[allow(clippy::must_use_candidate)]
    pub fn complete_exceptionally(&self, cause: Cause) -> bool {
        self.settle(Err(cause))
    }

    fn settle(&self, completion: Completion<T>) -> bool {
        let listeners = {
            let mut listeners = self.inner.listeners.lock();
            if self.inner.result.set(completion).is_err() {
                drop(listeners);
                debug!("completion ignored: slot already settled");
                return false;
            }
            std::mem::take(&mut *listeners)
        };
        self.inner.cond.notify_all();

        trace!(listeners = listeners.len(), "slot settled");
        if listeners.is_empty() {
            return true;
        }
        let jobs = listeners.into_iter().map(|listener| {
            let inner = Arc::clone(&self.inner);
            Box::new(move || {
                if let Some(completion) = inner.result.get() {
                    listener(completion);
                }
            }) as Job
        });
        dispatch(jobs);
        true
    }
}

impl<T: Clone> EventFuture<T> {
    /// Returns a copy of the settled outcome without blocking.
    #[must_use]
    pub fn peek(&self) -> Option<Completion<T>> {
        self.inner.result.get().cloned()
    }
}

impl<T: Clone + Send + Sync + 'static> EventFuture<T> {
    /// Blocks until the slot settles, the budget runs out, or the calling
    /// thread is interrupted.
    ///
    /// An already settled slot is reported even if the thread is interrupted
    /// or the budget is exhausted. Otherwise interruption is checked before
    /// the budget, so it wins when both hold at once.
    ///
    /// The budget is queried again after every wake-up. The wait also never
    /// outlives the time the budget reported when the wait began.
    pub fn wait<B: TimeBudget + ?Sized>(&self, budget: &B) -> Wait<T> {
        if let Some(completion) = self.inner.result.get() {
            return Wait::Ready(completion.clone());
        }

        let started = Instant::now();
        let hard_deadline = started.checked_add(budget.remaining());
        let parked = Parked::register(Arc::clone(&self.inner) as Arc<dyn Unpark>);
        let mut guard = self.inner.listeners.lock();

        loop {
            if let Some(completion) = self.inner.result.get() {
                return Wait::Ready(completion.clone());
            }
            if parked.take_interrupt() {
                drop(guard);
                debug!(waited_ms = started.elapsed().as_millis(), "wait interrupted");
                return Wait::Interrupted;
            }

            let mut left = budget.remaining();
            if let Some(deadline) = hard_deadline {
                left = left.min(deadline.saturating_duration_since(Instant::now()));
            }
            if left.is_zero() {
                drop(guard);
                let waited = started.elapsed();
                debug!(waited_ms = waited.as_millis(), "wait timed out");
                return Wait::TimedOut { waited };
            }

            let _ = self.inner.cond.wait_for(&mut guard, left);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> AsyncResult<T> for EventFuture<T> {
    fn on_complete(&self, callback: Box<dyn FnOnce(Completion<T>) + Send + 'static>) {
        self.when_complete(move |completion| callback(completion.clone()));
    }
}

impl<T> Clone for EventFuture<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for EventFuture<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for EventFuture<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for EventFuture<T> {}

impl<T> Hash for EventFuture<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl<T> fmt::Display for EventFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.result.get() {
            None => write!(f, "EventFuture[Not completed]"),
            Some(Ok(_)) => write!(f, "EventFuture[Completed normally]"),
            Some(Err(cause)) => write!(f, "EventFuture[Completed exceptionally: {cause}]"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for EventFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("EventFuture");
        match self.inner.result.get() {
            Some(completion) => d.field("result", completion),
            None => d.field("result", &format_args!("<pending>")),
        };
        d.finish()
    }
}
