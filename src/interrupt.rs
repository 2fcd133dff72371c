//! Per-thread interruption for blocking waits.
//!
//! Every thread owns an interrupt flag. Any other thread holding that
//! thread's [`InterruptHandle`] can raise the flag; if the target is blocked
//! in a wait it is woken immediately and the wait reports interruption.
//!
//! The flag is sticky: raising it while the target is not waiting makes its
//! next wait return at once. Reporting an interruption clears the flag.
//!
//! ```
//! use appevent::interrupt;
//! use std::thread;
//!
//! let handle = interrupt::current();
//! thread::spawn(move || handle.interrupt()).join().unwrap();
//! assert!(interrupt::interrupted());
//! assert!(!interrupt::interrupted());
//! ```

use core::fmt;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::tracing_compat::trace;

/// Something a blocked thread is parked on and that can be poked awake.
pub(crate) trait Unpark: Send + Sync {
    /// Wakes every thread parked on this object.
    fn unpark(&self);
}

struct InterruptState {
    flag: AtomicBool,
    /// What the owning thread is currently blocked on, if anything.
    parked: Mutex<Option<Arc<dyn Unpark>>>,
}

impl InterruptState {
    fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            parked: Mutex::new(None),
        }
    }
}

thread_local! {
    static CURRENT: Arc<InterruptState> = Arc::new(InterruptState::new());
}

fn current_state() -> Arc<InterruptState> {
    CURRENT.with(Arc::clone)
}

/// A handle to one thread's interrupt flag.
///
/// Handles are cheap to clone and can be sent to any thread.
#[derive(Clone)]
pub struct InterruptHandle {
    state: Arc<InterruptState>,
}

impl InterruptHandle {
    /// Interrupts the thread this handle belongs to.
    ///
    /// If that thread is blocked in a wait, the wait ends promptly with an
    /// interruption; otherwise its next wait does.
    pub fn interrupt(&self) {
        // Raise the flag before looking for a parked waiter: a waiter that
        // registers after this point is guaranteed to see the flag.
        self.state.flag.store(true, Ordering::SeqCst);
        let parked = self.state.parked.lock().clone();
        if let Some(parked) = parked {
            trace!("interrupting parked waiter");
            parked.unpark();
        }
    }

    /// Returns true if the flag is raised. Does not clear it.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.state.flag.load(Ordering::SeqCst)
    }

    /// Clears the flag, returning whether it was raised.
    pub fn clear(&self) -> bool {
        self.state.flag.swap(false, Ordering::SeqCst)
    }
}

impl PartialEq for InterruptHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for InterruptHandle {}

impl fmt::Debug for InterruptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptHandle")
            .field("interrupted", &self.is_interrupted())
            .finish()
    }
}

/// Returns the interrupt handle of the calling thread.
#[must_use]
pub fn current() -> InterruptHandle {
    InterruptHandle {
        state: current_state(),
    }
}

/// Returns true if the calling thread's flag is raised, clearing it.
pub fn interrupted() -> bool {
    CURRENT.with(|state| state.flag.swap(false, Ordering::SeqCst))
}

/// Returns true if the calling thread's flag is raised. Does not clear it.
#[must_use]
pub fn is_interrupted() -> bool {
    CURRENT.with(|state| state.flag.load(Ordering::SeqCst))
}

/// Registration of the calling thread as parked on some object.
///
/// Dropping the registration unregisters it.
pub(crate) struct Parked {
    state: Arc<InterruptState>,
}

impl Parked {
    /// Registers the calling thread as parked on `on`.
    ///
    /// Must be taken before the waiter's first flag check.
    pub(crate) fn register(on: Arc<dyn Unpark>) -> Self {
        let state = current_state();
        *state.parked.lock() = Some(on);
        Self { state }
    }

    /// Consumes a raised flag, returning whether it was raised.
    pub(crate) fn take_interrupt(&self) -> bool {
        self.state.flag.swap(false, Ordering::SeqCst)
    }
}

impl Drop for Parked {
    fn drop(&mut self) {
        self.state.parked.lock().take();
    }
}
