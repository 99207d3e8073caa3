//! Status codes and command type discriminators.

// ============================================================================
// StatusCode
// ============================================================================

/// Status carried by every command envelope.
///
/// Only the success/ack family is considered healthy; see
/// [`StatusCode::is_ok`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum StatusCode {
    /// Field not set.
    Unknown = 0,
    /// Delivered and accepted.
    Ok = 1,
    /// Acknowledgment emitted by a client.
    ClientAck = 2,
    /// Acknowledgment emitted by the signaling server.
    ServerAck = 3,
    /// Accepted by the vehicle application.
    ApplicationOk = 4,
    /// Acknowledged by the vehicle application.
    ApplicationAck = 5,
    /// Rejected by the client.
    ClientError = 6,
    /// Rejected by the signaling server.
    ServerError = 7,
    /// Rejected by the vehicle application.
    ApplicationError = 8,
    /// Envelope expired before delivery.
    Expired = 9,
}

impl StatusCode {
    /// Returns `true` for the success/ack family.
    #[inline]
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(
            self,
            Self::Ok | Self::ClientAck | Self::ServerAck | Self::ApplicationOk | Self::ApplicationAck
        )
    }

    /// Classifies a raw wire value.
    ///
    /// Values outside the known enumeration are never OK.
    #[inline]
    #[must_use]
    pub fn is_ok_code(code: i32) -> bool {
        Self::try_from(code).is_ok_and(Self::is_ok)
    }
}

// ============================================================================
// CommandType
// ============================================================================

/// Discriminator telling what kind of payload an envelope carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum CommandType {
    /// Field not set.
    Unknown = 0,
    /// Signed command addressed to the vehicle.
    SignedCommand = 1,
    /// Signed command response addressed to the client.
    SignedCommandResponse = 2,
}

// ============================================================================
// Tests
// ============================================================================
