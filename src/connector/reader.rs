//! Background read loop.
//!
//! One task per connector owns the read half of the socket. For every frame:
//!
//! 1. Decode the outer envelope (failure: count, log, skip the frame)
//! 2. Check the status against the success/ack set (failure: count, log)
//! 3. Queue signed-command response payloads without blocking
//! 4. Acknowledge the frame, whatever happened in steps 2 and 3
//!
//! Per-frame failures never end the loop. A socket error, a close frame, or
//! the end of the stream does, and closes the delivery queue.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use bytes::Bytes;
use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::protocol::{CommandMessage, HermesMessage, RoutableMessage};
use crate::transport::{FrameWriter, WsSource};

use super::health::Health;
use super::inbox::Inbox;

// ============================================================================
// ReadLoop
// ============================================================================

/// State owned by the read task.
pub(crate) struct ReadLoop {
    source: WsSource,
    writer: Arc<FrameWriter>,
    inbox: Arc<Inbox>,
    health: Arc<Health>,
}

impl ReadLoop {
    pub(crate) fn new(
        source: WsSource,
        writer: Arc<FrameWriter>,
        inbox: Arc<Inbox>,
        health: Arc<Health>,
    ) -> Self {
        Self {
            source,
            writer,
            inbox,
            health,
        }
    }

    /// Reads frames until the socket ends.
    pub(crate) async fn run(mut self) {
        loop {
            match self.source.next().await {
                Some(Ok(Message::Binary(data))) => self.handle_frame(data).await,

                Some(Ok(Message::Text(text))) => {
                    self.handle_frame(Bytes::copy_from_slice(text.as_bytes()))
                        .await;
                }

                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "Signaling socket closed by remote");
                    self.health.mark_closed();
                    break;
                }

                Some(Err(e)) => {
                    error!(error = %e, "Signaling socket read failed");
                    self.health.mark_failed(e.to_string());
                    break;
                }

                None => {
                    debug!("Signaling stream ended");
                    self.health.mark_closed();
                    break;
                }

                // Ping/pong are answered by the transport
                Some(Ok(_)) => {}
            }
        }

        if self.inbox.close() {
            debug!("Delivery queue closed by read loop");
        }
        debug!("Read loop terminated");
    }

    /// Processes one inbound frame.
    async fn handle_frame(&self, frame: Bytes) {
        let stats = self.health.stats();
        stats.record_frame();

        let command = match HermesMessage::decode_command(frame) {
            Ok(command) => command,
            Err(e) => {
                stats.record_decode_failure();
                warn!(error = %e, "Dropping undecodable frame");
                return;
            }
        };

        trace!(
            txid = %command.transaction_id(),
            topic = %command.topic_lossy(),
            status = command.status_code,
            command_type = command.command_type,
            payload_len = command.payload.len(),
            "Received envelope"
        );

        if let Err(e) = self.deliver(&command) {
            warn!(txid = %command.transaction_id(), error = %e, "Inbound envelope not delivered");
        }

        self.acknowledge(&command).await;
    }

    /// Queues the payload of a successful signed-command response.
    fn deliver(&self, command: &CommandMessage) -> Result<()> {
        let stats = self.health.stats();

        if !command.is_status_ok() {
            stats.record_status_failure();
            debug!(
                payload = %String::from_utf8_lossy(&command.payload),
                "Received status not OK"
            );
            return Err(Error::status(command.status_code));
        }

        if !command.is_signed_response() {
            return Ok(());
        }

        match RoutableMessage::inspect(&command.payload) {
            Ok(routable) => debug!(routable = %routable.summary(), "Decoded response payload"),
            Err(e) => {
                stats.record_payload_decode_failure();
                debug!(error = %e, "Response payload is not a routable message");
            }
        }

        match self.inbox.push(command.payload.clone()) {
            Ok(()) => {
                stats.record_delivered();
                Ok(())
            }
            Err(e) => {
                if matches!(e, Error::InboxFull { .. }) {
                    stats.record_dropped();
                }
                Err(e)
            }
        }
    }

    /// Writes the client ack for `command`. Failures are counted, not raised.
    async fn acknowledge(&self, command: &CommandMessage) {
        let ack = HermesMessage::ack(command);
        let stats = self.health.stats();

        match self.writer.write(&ack).await {
            Ok(()) => {
                stats.record_ack();
                trace!(request_txid = %command.transaction_id(), "Ack sent");
            }
            Err(e) => {
                stats.record_ack_failure();
                warn!(
                    request_txid = %command.transaction_id(),
                    error = %e,
                    "Failed to send ack"
                );
            }
        }
    }
}
