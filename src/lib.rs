//! Appevent: one-shot completable application events.
//!
//! # Overview
//!
//! A client library's application thread submits work to a background
//! pipeline as an *event* and later collects the result on its own thread.
//! This crate provides the result side of that handoff: a slot that is
//! completed exactly once by whichever thread produces the outcome, and a
//! bounded, interruptible retrieval that turns every way of not getting a
//! value into one of a small set of error kinds.
//!
//! # Core Guarantees
//!
//! - **Exactly once**: the first completion wins; later ones are no-ops
//! - **Safe publication**: a reader that sees a result sees all of it
//! - **Bounded waits**: retrieval never blocks past the caller's time budget
//! - **Prompt interruption**: interrupting a waiting thread ends its wait
//! - **Closed error surface**: only [`Error`] values leave a retrieval
//!
//! # Module Structure
//!
//! - [`event`]: [`CompletableEvent`], event kinds and identities
//! - [`future`]: the shared result slot and the [`AsyncResult`] source trait
//! - [`time`]: time budgets ([`TimeBudget`], [`Timer`])
//! - [`interrupt`]: per-thread interruption of blocking waits
//! - [`error`]: the error taxonomy
//! - [`config`]: default wait budget configuration
//! - [`tracing_compat`]: structured logging shim

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod event;
pub mod future;
pub mod interrupt;
pub mod time;
pub mod tracing_compat;

pub use config::{ConfigError, EventConfig};
pub use error::{Cause, Error, ErrorCategory, ErrorKind, Result, ResultExt};
pub use event::{CompletableEvent, EventId, EventKind};
pub use future::{AsyncResult, Completion, EventFuture, Wait};
pub use interrupt::InterruptHandle;
pub use time::{Clock, ManualClock, TimeBudget, Timer, WallClock};
