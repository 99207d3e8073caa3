//! Envelope messages and constructors.
//!
//! # Format
//!
//! ```text
//! HermesMessage
//! └── command_message: CommandMessage
//!     ├── txid          (1)  bytes      fresh per envelope
//!     ├── topic         (2)  bytes      routing key
//!     ├── expiry        (3)  Timestamp  commands only
//!     ├── request_txid  (4)  bytes      acknowledged txid
//!     ├── payload       (5)  bytes      opaque session-layer bytes
//!     ├── status_code   (6)  StatusCode
//!     ├── command_type  (7)  CommandType
//!     └── options       (8)  MessageOptions { token }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use bytes::Bytes;
use prost::Message;

use crate::error::{Error, Result};
use crate::identifiers::TransactionId;

use super::status::{CommandType, StatusCode};

// ============================================================================
// Messages
// ============================================================================

/// Outer frame exchanged over the socket.
#[derive(Clone, PartialEq, Message)]
pub struct HermesMessage {
    /// The wrapped command envelope.
    #[prost(message, optional, tag = "1")]
    pub command_message: Option<CommandMessage>,
}

/// Command, acknowledgment or response envelope.
#[derive(Clone, PartialEq, Message)]
pub struct CommandMessage {
    /// Transaction id of this envelope.
    #[prost(bytes = "bytes", tag = "1")]
    pub txid: Bytes,

    /// Routing topic.
    #[prost(bytes = "bytes", tag = "2")]
    pub topic: Bytes,

    /// Validity window understood by the remote end.
    #[prost(message, optional, tag = "3")]
    pub expiry: Option<Timestamp>,

    /// Transaction id this envelope answers.
    #[prost(bytes = "bytes", tag = "4")]
    pub request_txid: Bytes,

    /// Opaque payload.
    #[prost(bytes = "bytes", tag = "5")]
    pub payload: Bytes,

    /// Delivery status.
    #[prost(enumeration = "StatusCode", tag = "6")]
    pub status_code: i32,

    /// Payload kind.
    #[prost(enumeration = "CommandType", tag = "7")]
    pub command_type: i32,

    /// Per-envelope options.
    #[prost(message, optional, tag = "8")]
    pub options: Option<MessageOptions>,
}

/// Seconds/nanos timestamp.
#[derive(Clone, Copy, PartialEq, Message)]
pub struct Timestamp {
    /// Whole seconds.
    #[prost(int64, tag = "1")]
    pub seconds: i64,

    /// Sub-second nanoseconds.
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

/// Envelope options.
#[derive(Clone, PartialEq, Message)]
pub struct MessageOptions {
    /// Device-level auth token.
    #[prost(bytes = "bytes", tag = "1")]
    pub token: Bytes,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<Duration> for Timestamp {
    fn from(value: Duration) -> Self {
        Self {
            seconds: i64::try_from(value.as_secs()).unwrap_or(i64::MAX),
            // subsec_nanos is always below 1e9
            nanos: value.subsec_nanos() as i32,
        }
    }
}

// ============================================================================
// HermesMessage - Constructors
// ============================================================================

impl HermesMessage {
    /// Builds a command envelope carrying `payload` to `topic`.
    #[must_use]
    pub fn command(
        txid: TransactionId,
        topic: impl Into<Bytes>,
        payload: Bytes,
        token: impl Into<Bytes>,
        expiry: Duration,
    ) -> Self {
        Self {
            command_message: Some(CommandMessage {
                txid: txid.into_bytes(),
                topic: topic.into(),
                expiry: Some(expiry.into()),
                payload,
                options: Some(MessageOptions {
                    token: token.into(),
                }),
                ..Default::default()
            }),
        }
    }

    /// Builds the acknowledgment for an inbound envelope.
    ///
    /// The ack gets a fresh transaction id, echoes the inbound topic, and
    /// carries no payload.
    #[must_use]
    pub fn ack(inbound: &CommandMessage) -> Self {
        let mut command = CommandMessage {
            txid: TransactionId::generate().into_bytes(),
            topic: inbound.topic.clone(),
            request_txid: inbound.txid.clone(),
            ..Default::default()
        };
        command.set_status_code(StatusCode::ClientAck);

        Self {
            command_message: Some(command),
        }
    }

    /// Serializes the envelope into a frame body.
    #[inline]
    #[must_use]
    pub fn to_frame(&self) -> Bytes {
        Bytes::from(self.encode_to_vec())
    }

    /// Decodes a frame body and unwraps its command envelope.
    ///
    /// # Errors
    ///
    /// - [`Error::Decode`] if the bytes are not a valid envelope
    /// - [`Error::MissingCommand`] if the envelope is empty
    pub fn decode_command(frame: Bytes) -> Result<CommandMessage> {
        Self::decode(frame)?
            .command_message
            .ok_or(Error::MissingCommand)
    }
}

// ============================================================================
// CommandMessage - Accessors
// ============================================================================

impl CommandMessage {
    /// Returns the transaction id of this envelope.
    #[inline]
    #[must_use]
    pub fn transaction_id(&self) -> TransactionId {
        TransactionId::from_wire(self.txid.clone())
    }

    /// Returns `true` if the status is in the success/ack family.
    #[inline]
    #[must_use]
    pub fn is_status_ok(&self) -> bool {
        StatusCode::is_ok_code(self.status_code)
    }

    /// Returns `true` if this envelope carries a signed-command response.
    #[inline]
    #[must_use]
    pub fn is_signed_response(&self) -> bool {
        self.command_type() == CommandType::SignedCommandResponse
    }

    /// Returns `true` if this envelope is a client acknowledgment.
    #[inline]
    #[must_use]
    pub fn is_client_ack(&self) -> bool {
        self.status_code == StatusCode::ClientAck as i32
    }

    /// Returns the topic as lossy UTF-8, for logging.
    #[inline]
    #[must_use]
    pub fn topic_lossy(&self) -> String {
        String::from_utf8_lossy(&self.topic).into_owned()
    }
}

// ============================================================================
// Tests
// ============================================================================
