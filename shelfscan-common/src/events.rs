//! Scan lifecycle events
//!
//! The orchestrator publishes every state transition and every attempt
//! outcome on an [`EventBus`]. Subscribers (CLI status printer, tests) see
//! events emitted after they subscribe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

/// Orchestrator state for one scan attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    /// Frame source live, waiting for a trigger
    Idle,
    Capturing,
    Recognizing,
    Classifying,
    Resolving,
    Displaying,
    /// Pseudo-state: an attempt failed, always followed by `Idle`
    Failed,
}

impl ScanState {
    /// Whether a new attempt may start from this state
    pub fn accepts_trigger(&self) -> bool {
        matches!(self, ScanState::Idle)
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanState::Idle => "idle",
            ScanState::Capturing => "capturing",
            ScanState::Recognizing => "recognizing",
            ScanState::Classifying => "classifying",
            ScanState::Resolving => "resolving",
            ScanState::Displaying => "displaying",
            ScanState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Events emitted during a scanning session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScanEvent {
    /// Orchestrator moved between states
    StateChanged {
        old_state: ScanState,
        new_state: ScanState,
        timestamp: DateTime<Utc>,
    },

    /// A trigger arrived while an attempt was in flight and was dropped
    TriggerIgnored {
        state: ScanState,
        timestamp: DateTime<Utc>,
    },

    /// A book was resolved and handed to the presenter
    BookResolved {
        isbn: String,
        title: String,
        timestamp: DateTime<Utc>,
    },

    /// The append-log request could not be sent
    AppendFailed {
        isbn: String,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// A recoverable attempt failure; capture was resumed
    AttemptFailed {
        message: String,
        timestamp: DateTime<Utc>,
    },
}

/// Broadcast bus for [`ScanEvent`]s
///
/// Non-blocking publish; slow subscribers observe `Lagged` rather than
/// blocking the orchestrator.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ScanEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.tx.subscribe()
    }

    /// Emit an event
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: ScanEvent) -> Result<usize, broadcast::error::SendError<ScanEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ScanEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
