//! Application events submitted by caller threads to the background pipeline.
//!
//! - [`EventKind`]: what operation an event stands for (used by dispatch only)
//! - [`EventId`]: process-unique event identity
//! - [`CompletableEvent`]: an event carrying a result the caller waits for

mod completable;

pub use completable::CompletableEvent;

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

/// Category of an application event.
///
/// The completion logic never looks at the kind; the dispatcher routes on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Commit offsets, waiting for the broker's acknowledgement.
    Commit,
    /// Commit offsets without waiting.
    AsyncCommit,
    /// Fetch the committed offsets of a set of partitions.
    FetchCommittedOffsets,
    /// Look up offsets by timestamp.
    ListOffsets,
    /// Reset fetch positions that have none.
    ResetPositions,
    /// Validate fetch positions after a leader change.
    ValidatePositions,
    /// Fetch metadata for one topic.
    TopicMetadata,
    /// Fetch metadata for all topics.
    AllTopicsMetadata,
    /// A subscription changed.
    SubscriptionChange,
    /// Drop the current subscription.
    Unsubscribe,
    /// Application poll heartbeat.
    Poll,
    /// Leave the group as part of closing.
    LeaveOnClose,
}

impl EventKind {
    /// Returns the stable upper-case name of the kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Commit => "COMMIT",
            Self::AsyncCommit => "ASYNC_COMMIT",
            Self::FetchCommittedOffsets => "FETCH_COMMITTED_OFFSETS",
            Self::ListOffsets => "LIST_OFFSETS",
            Self::ResetPositions => "RESET_POSITIONS",
            Self::ValidatePositions => "VALIDATE_POSITIONS",
            Self::TopicMetadata => "TOPIC_METADATA",
            Self::AllTopicsMetadata => "ALL_TOPICS_METADATA",
            Self::SubscriptionChange => "SUBSCRIPTION_CHANGE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Poll => "POLL",
            Self::LeaveOnClose => "LEAVE_ON_CLOSE",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A process-unique event identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u64);

impl EventId {
    /// Allocates the next identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = EventId::next();
        let b = EventId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn id_formatting() {
        let id = EventId(17);
        assert_eq!(format!("{id:?}"), "EventId(17)");
        assert_eq!(id.to_string(), "E17");
        assert_eq!(id.as_u64(), 17);
    }

    #[test]
    fn kind_names_are_screaming_snake() {
        assert_eq!(EventKind::FetchCommittedOffsets.to_string(), "FETCH_COMMITTED_OFFSETS");
        assert_eq!(EventKind::LeaveOnClose.name(), "LEAVE_ON_CLOSE");
    }
}
