//! Diagnostic view of session-layer payloads.
//!
//! Signed-command responses embed a session-layer routable message. The
//! connector never interprets it; it is decoded only to log correlation ids
//! while debugging. Fields not listed here are skipped by the decoder.

// ============================================================================
// Imports
// ============================================================================

use bytes::Bytes;
use prost::Message;

use crate::error::Result;

// ============================================================================
// RoutableMessage
// ============================================================================

/// Subset of the session-layer routable message.
#[derive(Clone, PartialEq, Message)]
pub struct RoutableMessage {
    /// Encoded inner command or response.
    #[prost(bytes = "bytes", tag = "10")]
    pub protobuf_message_as_bytes: Bytes,

    /// Session info returned by a handshake.
    #[prost(bytes = "bytes", tag = "15")]
    pub session_info: Bytes,

    /// Id of the request this message answers.
    #[prost(bytes = "bytes", tag = "50")]
    pub request_uuid: Bytes,

    /// Id of this message.
    #[prost(bytes = "bytes", tag = "51")]
    pub uuid: Bytes,

    /// Routing flags.
    #[prost(uint32, tag = "52")]
    pub flags: u32,
}

impl RoutableMessage {
    /// Decodes a payload for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) if the payload is not
    /// protobuf.
    pub fn inspect(payload: &Bytes) -> Result<Self> {
        Ok(Self::decode(payload.clone())?)
    }

    /// One-line summary for log fields.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "uuid={} request_uuid={} message={}B session_info={}B flags={:#x}",
            hex(&self.uuid),
            hex(&self.request_uuid),
            self.protobuf_message_as_bytes.len(),
            self.session_info.len(),
            self.flags
        )
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ============================================================================
// Tests
// ============================================================================
