//! Event types for the railwatch event system
//!
//! Provides the session event definitions and the EventBus shared by the
//! upload session, the metrics source and whatever renders them.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Upload session lifecycle status
///
/// Idle → Selecting → Uploading → Succeeded | Failed, with Selecting re-enterable
/// from every status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No file chosen yet
    Idle,
    /// A file is selected and the session is ready to submit
    Selecting,
    /// Transfer in flight
    Uploading,
    /// Detection response received and normalized
    Succeeded,
    /// Transfer, decoding or cancellation failure
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Selecting => "selecting",
            SessionStatus::Uploading => "uploading",
            SessionStatus::Succeeded => "succeeded",
            SessionStatus::Failed => "failed",
        }
    }

    /// Whether the status ends a transfer
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Succeeded | SessionStatus::Failed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session and metrics events
///
/// Events are broadcast via EventBus and can be serialized for any push channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Session status changed
    StateChanged {
        session_id: Uuid,
        old_status: SessionStatus,
        new_status: SessionStatus,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Displayed upload progress changed (non-decreasing within a transfer)
    UploadProgress {
        session_id: Uuid,
        percent: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Detection response normalized; `refresh_signal` is the new success count
    DetectionCompleted {
        session_id: Uuid,
        refresh_signal: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Upload ended in failure with a user-facing message
    DetectionFailed {
        session_id: Uuid,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Independent metrics fetch started
    MetricsLoading {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Metrics available; `fetched` is false when derived from a local result
    MetricsResolved {
        fetched: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl SessionEvent {
    /// Event type name (matches the serde tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::StateChanged { .. } => "StateChanged",
            SessionEvent::UploadProgress { .. } => "UploadProgress",
            SessionEvent::DetectionCompleted { .. } => "DetectionCompleted",
            SessionEvent::DetectionFailed { .. } => "DetectionFailed",
            SessionEvent::MetricsLoading { .. } => "MetricsLoading",
            SessionEvent::MetricsResolved { .. } => "MetricsResolved",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use railwatch_common::events::{EventBus, SessionEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(SessionEvent::MetricsLoading {
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(matches!(rx.try_recv(), Ok(SessionEvent::MetricsLoading { .. })));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: SessionEvent,
    ) -> Result<usize, broadcast::error::SendError<SessionEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_errors() {
        let bus = EventBus::new(10);
        let result = bus.emit(SessionEvent::MetricsLoading {
            timestamp: chrono::Utc::now(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_subscriber_receives_event() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let session_id = Uuid::new_v4();
        bus.emit(SessionEvent::UploadProgress {
            session_id,
            percent: 42,
            timestamp: chrono::Utc::now(),
        })
        .unwrap();

        match rx.try_recv().unwrap() {
            SessionEvent::UploadProgress { session_id: id, percent, .. } => {
                assert_eq!(id, session_id);
                assert_eq!(percent, 42);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = SessionEvent::StateChanged {
            session_id: Uuid::nil(),
            old_status: SessionStatus::Selecting,
            new_status: SessionStatus::Uploading,
            timestamp: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "StateChanged");
        assert_eq!(json["old_status"], "selecting");
        assert_eq!(json["new_status"], "uploading");
        assert_eq!(event.event_type(), "StateChanged");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(SessionStatus::Succeeded.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
        assert!(!SessionStatus::Uploading.is_terminal());
        assert!(!SessionStatus::Idle.is_terminal());
    }
}
