//! Time budgets for bounded waits.
//!
//! A time budget is a countdown owned by the caller and shared across every
//! wait performed on behalf of one logical API call. Waits query it for the
//! remaining time instead of starting a fresh timeout window.
//!
//! - [`TimeBudget`]: the "remaining time" query consumed by waits
//! - [`Timer`]: a deadline-based countdown over a [`Clock`]
//! - [`WallClock`] / [`ManualClock`]: real and hand-driven time sources

mod timer;

pub use timer::{Clock, ManualClock, TimeBudget, Timer, WallClock};
