//! Bounded delivery queue for response payloads.
//!
//! The read loop is the only producer and never blocks: a push into a full
//! queue drops the new payload. Consumers drain through [`Responses`] at
//! their own pace.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::{Error, Result};

// ============================================================================
// Inbox
// ============================================================================

/// Producer side of the delivery queue, owned by the connector.
#[derive(Debug)]
pub(crate) struct Inbox {
    /// `None` once the queue has been closed.
    tx: Mutex<Option<mpsc::Sender<Bytes>>>,
    capacity: usize,
}

impl Inbox {
    /// Creates a queue holding at most `capacity` payloads.
    pub(crate) fn new(capacity: usize) -> (Self, Responses) {
        let (tx, rx) = mpsc::channel(capacity);
        let inbox = Self {
            tx: Mutex::new(Some(tx)),
            capacity,
        };
        (inbox, Responses::new(rx))
    }

    /// Queues a payload without waiting.
    ///
    /// # Errors
    ///
    /// - [`Error::InboxFull`] if the queue is at capacity (payload dropped)
    /// - [`Error::ConnectionClosed`] if the queue was closed
    pub(crate) fn push(&self, payload: Bytes) -> Result<()> {
        let guard = self.tx.lock();
        let tx = guard.as_ref().ok_or(Error::ConnectionClosed)?;

        match tx.try_send(payload) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(Error::inbox_full(self.capacity)),
            Err(TrySendError::Closed(_)) => Err(Error::ConnectionClosed),
        }
    }

    /// Drops the producer so consumers observe the end of the stream.
    ///
    /// Returns `false` if the queue was already closed.
    pub(crate) fn close(&self) -> bool {
        self.tx.lock().take().is_some()
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Read-only handle to the delivery queue.
///
/// Cheap to clone; all clones drain the same queue. Yields `None` once the
/// connector is closed and the queue is empty.
#[derive(Debug, Clone)]
pub struct Responses {
    rx: Arc<tokio::sync::Mutex<mpsc::Receiver<Bytes>>>,
}

impl Responses {
    fn new(rx: mpsc::Receiver<Bytes>) -> Self {
        Self {
            rx: Arc::new(tokio::sync::Mutex::new(rx)),
        }
    }

    /// Waits for the next response payload.
    ///
    /// Returns `None` when the queue is closed and drained. There is no
    /// timeout; wrap in [`tokio::time::timeout`] if a deadline is needed.
    pub async fn recv(&self) -> Option<Bytes> {
        self.rx.lock().await.recv().await
    }

    /// Takes a payload if one is ready.
    ///
    /// Returns `None` if the queue is empty, closed, or another consumer is
    /// currently receiving.
    #[must_use]
    pub fn try_recv(&self) -> Option<Bytes> {
        self.rx.try_lock().ok()?.try_recv().ok()
    }

    /// Number of payloads waiting in the queue.
    ///
    /// Reports 0 while another consumer is inside [`Responses::recv`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.try_lock().map_or(0, |rx| rx.len())
    }

    /// Returns `true` if no payload is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Closes the queue and discards anything left in it.
    ///
    /// Returns the number of discarded payloads.
    pub(crate) async fn close_and_drain(&self) -> usize {
        let mut rx = self.rx.lock().await;
        rx.close();

        let mut discarded = 0;
        while rx.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }
}

// ============================================================================
// Tests
// ============================================================================
