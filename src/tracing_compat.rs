//! Structured logging shim.
//!
//! Completion and wait paths log through `trace!` and `debug!` from here.
//! With the `tracing-integration` feature these are the `tracing` macros;
//! without it they expand to nothing, so the hot path carries no logging
//! cost and the crate builds without `tracing`.
//!
//! Levels in use:
//!
//! | Level | Events |
//! |-------|--------|
//! | `trace` | event created, chained, completed; slot settled |
//! | `debug` | late completion ignored, wait interrupted, wait timed out |

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, trace};

#[cfg(not(feature = "tracing-integration"))]
mod disabled {
    /// Expands to nothing when `tracing-integration` is off.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing when `tracing-integration` is off.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    pub use crate::{debug, trace};
}

#[cfg(not(feature = "tracing-integration"))]
pub use disabled::*;
