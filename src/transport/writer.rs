//! Serialized frame writer.
//!
//! Command sends and acknowledgments from the read loop both go through one
//! [`FrameWriter`]. The lock is held for encode plus write, so the bytes of
//! two envelopes never interleave on the wire.

// ============================================================================
// Imports
// ============================================================================

use futures_util::SinkExt;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tracing::trace;

use crate::error::Result;
use crate::protocol::HermesMessage;

use super::WsSink;

// ============================================================================
// FrameWriter
// ============================================================================

/// Write half of the socket behind an exclusive lock.
pub struct FrameWriter {
    /// Socket sink, locked for the duration of one write.
    sink: Mutex<WsSink>,
}

impl FrameWriter {
    /// Wraps the write half of a socket.
    #[inline]
    #[must_use]
    pub fn new(sink: WsSink) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Encodes `envelope` and writes it as one binary frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WebSocket`](crate::Error::WebSocket) if the write fails.
    pub async fn write(&self, envelope: &HermesMessage) -> Result<()> {
        let mut sink = self.sink.lock().await;

        let frame = envelope.to_frame();
        trace!(len = frame.len(), "Writing frame");

        sink.send(Message::Binary(frame)).await?;
        Ok(())
    }

    /// Sends a close frame and closes the sink.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WebSocket`](crate::Error::WebSocket) if the close
    /// handshake cannot be written.
    pub async fn close(&self) -> Result<()> {
        let mut sink = self.sink.lock().await;
        sink.close().await?;
        Ok(())
    }
}

impl std::fmt::Debug for FrameWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter").finish_non_exhaustive()
    }
}
