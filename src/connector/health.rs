//! Connector health and per-frame counters.
//!
//! [`ConnectorState`] is published through a watch channel so callers can be
//! notified when the read loop dies. Per-frame conditions that never end the
//! session (decode failures, bad statuses, queue overflow, ack write
//! failures) are counted in [`ConnectorStats`].

// ============================================================================
// Imports
// ============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

// ============================================================================
// ConnectorState
// ============================================================================

/// Lifecycle state of a connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorState {
    /// Socket open, read loop running.
    Open,
    /// Closed locally or by the remote end.
    Closed,
    /// Read loop terminated on a socket error.
    Failed {
        /// Error reported by the socket.
        reason: String,
    },
}

impl ConnectorState {
    /// Returns `true` while the connector can send and receive.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` if the read loop died on an error.
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

// ============================================================================
// StatsSnapshot
// ============================================================================

/// Point-in-time copy of [`ConnectorStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Frames read off the socket.
    pub frames_received: u64,
    /// Frames that failed outer decoding.
    pub decode_failures: u64,
    /// Frames with a status outside the success/ack set.
    pub status_failures: u64,
    /// Response payloads that did not decode as routable messages.
    pub payload_decode_failures: u64,
    /// Response payloads placed on the delivery queue.
    pub responses_delivered: u64,
    /// Response payloads dropped because the queue was full.
    pub responses_dropped: u64,
    /// Acknowledgments written.
    pub acks_sent: u64,
    /// Acknowledgments whose write failed.
    pub ack_failures: u64,
    /// Commands written by `send`.
    pub commands_sent: u64,
}

// ============================================================================
// ConnectorStats
// ============================================================================

/// Lock-free counters updated by the read loop and the send path.
#[derive(Debug, Default)]
pub struct ConnectorStats {
    frames_received: AtomicU64,
    decode_failures: AtomicU64,
    status_failures: AtomicU64,
    payload_decode_failures: AtomicU64,
    responses_delivered: AtomicU64,
    responses_dropped: AtomicU64,
    acks_sent: AtomicU64,
    ack_failures: AtomicU64,
    commands_sent: AtomicU64,
}

impl ConnectorStats {
    pub(crate) fn record_frame(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_status_failure(&self) {
        self.status_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_payload_decode_failure(&self) {
        self.payload_decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self) {
        self.responses_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.responses_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ack(&self) {
        self.acks_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ack_failure(&self) {
        self.ack_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_command(&self) {
        self.commands_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            status_failures: self.status_failures.load(Ordering::Relaxed),
            payload_decode_failures: self.payload_decode_failures.load(Ordering::Relaxed),
            responses_delivered: self.responses_delivered.load(Ordering::Relaxed),
            responses_dropped: self.responses_dropped.load(Ordering::Relaxed),
            acks_sent: self.acks_sent.load(Ordering::Relaxed),
            ack_failures: self.ack_failures.load(Ordering::Relaxed),
            commands_sent: self.commands_sent.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// State channel plus counters, shared by the connector and its read loop.
#[derive(Debug)]
pub(crate) struct Health {
    state: watch::Sender<ConnectorState>,
    stats: ConnectorStats,
}

impl Health {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(ConnectorState::Open);
        Self {
            state,
            stats: ConnectorStats::default(),
        }
    }

    pub(crate) fn state(&self) -> ConnectorState {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<ConnectorState> {
        self.state.subscribe()
    }

    pub(crate) fn stats(&self) -> &ConnectorStats {
        &self.stats
    }

    /// Moves `Open` to `Closed`. Terminal states are kept.
    pub(crate) fn mark_closed(&self) {
        self.transition(ConnectorState::Closed);
    }

    /// Moves `Open` to `Failed`. Terminal states are kept.
    pub(crate) fn mark_failed(&self, reason: impl Into<String>) {
        self.transition(ConnectorState::Failed {
            reason: reason.into(),
        });
    }

    fn transition(&self, next: ConnectorState) {
        self.state.send_if_modified(|current| {
            if current.is_open() {
                *current = next;
                true
            } else {
                false
            }
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
