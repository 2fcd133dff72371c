//! Deadline-based countdown timers.

use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A source of the remaining time a caller is willing to wait.
///
/// Implementations must return a non-negative duration that never grows
/// across calls made during one logical wait.
pub trait TimeBudget {
    /// Returns the time left before the budget is exhausted.
    fn remaining(&self) -> Duration;

    /// Returns true once no time is left.
    fn is_exhausted(&self) -> bool {
        self.remaining().is_zero()
    }
}

impl<B: TimeBudget + ?Sized> TimeBudget for &B {
    fn remaining(&self) -> Duration {
        (**self).remaining()
    }
}

impl<B: TimeBudget + ?Sized> TimeBudget for Arc<B> {
    fn remaining(&self) -> Duration {
        (**self).remaining()
    }
}

/// A fixed window. Waits bound themselves to it from the moment they start.
impl TimeBudget for Duration {
    fn remaining(&self) -> Duration {
        *self
    }
}

/// A monotonic time source.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same current instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Creates a manual clock starting at the current wall-clock instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = now.checked_add(by).unwrap_or(*now);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// A countdown towards a deadline.
///
/// The deadline is fixed when the timer is created (or reset); every query
/// reads the clock again, so a timer shared by several consecutive waits
/// hands each of them only what the previous ones left over.
///
/// # Example
///
/// ```
/// use appevent::time::{ManualClock, TimeBudget, Timer};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let timer = Timer::with_clock(Duration::from_millis(100), clock.clone());
/// clock.advance(Duration::from_millis(30));
/// assert_eq!(timer.remaining(), Duration::from_millis(70));
/// ```
pub struct Timer {
    clock: Arc<dyn Clock>,
    start: Instant,
    timeout: Duration,
    /// `None` when `start + timeout` does not fit in an `Instant`.
    deadline: Option<Instant>,
}

impl Timer {
    /// Creates a timer over the wall clock.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_clock(timeout, WallClock)
    }

    /// Creates a timer over the given clock.
    #[must_use]
    pub fn with_clock(timeout: Duration, clock: impl Clock + 'static) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(clock);
        let start = clock.now();
        Self {
            deadline: start.checked_add(timeout),
            clock,
            start,
            timeout,
        }
    }

    /// Restarts the countdown from now with a new timeout.
    pub fn reset(&mut self, timeout: Duration) {
        self.start = self.clock.now();
        self.timeout = timeout;
        self.deadline = self.start.checked_add(timeout);
    }

    /// Returns the timeout this timer was created (or last reset) with.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the deadline, or `None` if it lies beyond what `Instant` can hold.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time elapsed since the timer started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.start)
    }

    /// Returns true once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

impl TimeBudget for Timer {
    fn remaining(&self) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(self.clock.now()),
            None => self.timeout.saturating_sub(self.elapsed()),
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("timeout", &self.timeout)
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}
