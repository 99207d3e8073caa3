//! Type-safe identifiers.
//!
//! Newtype wrappers keep transaction ids and vehicle identifiers from being
//! mixed up with arbitrary byte strings.
//!
//! | Type | Wire form |
//! |------|-----------|
//! | [`TransactionId`] | UUID v4 rendered as hyphenated text bytes |
//! | [`Vin`] | Vehicle identification number, used to derive topics |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use bytes::Bytes;
use uuid::Uuid;

// ============================================================================
// TransactionId
// ============================================================================

/// Identifier carried in the `txid` field of every envelope.
///
/// Outbound envelopes always get a fresh id from [`TransactionId::generate`].
/// Inbound ids are kept as raw bytes since the remote end is free to use any
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId(Bytes);

impl TransactionId {
    /// Generates a new random transaction id.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Bytes::from(Uuid::new_v4().to_string()))
    }

    /// Wraps raw bytes received on the wire.
    #[inline]
    #[must_use]
    pub fn from_wire(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Returns the wire bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the id, returning the wire bytes.
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

// ============================================================================
// Vin
// ============================================================================

/// Vehicle identification number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vin(String);

impl Vin {
    /// Creates a VIN from any string.
    #[inline]
    #[must_use]
    pub fn new(vin: impl Into<String>) -> Self {
        Self(vin.into())
    }

    /// Returns the VIN as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the topic commands for this vehicle are published on.
    ///
    /// Format: `vehicle_device.{vin}.cmds`
    #[inline]
    #[must_use]
    pub fn command_topic(&self) -> String {
        format!("vehicle_device.{}.cmds", self.0)
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Vin {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Vin {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
