//! Contract between the connector and the session/command layer.
//!
//! The session layer builds and signs command payloads; it only needs a
//! transport that moves opaque bytes and reports a couple of static hints.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::connector::{Connector, Responses};
use crate::error::Result;

// ============================================================================
// AuthMethod
// ============================================================================

/// Authentication scheme the session layer should use over this transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AuthMethod {
    /// AES-GCM authenticated payloads.
    Gcm,
    /// HMAC-tagged payloads.
    #[default]
    Hmac,
}

// ============================================================================
// VehicleTransport
// ============================================================================

/// Byte transport to one vehicle.
///
/// This trait is object-safe, so `Box<dyn VehicleTransport>` works.
#[async_trait]
pub trait VehicleTransport: Send + Sync {
    /// Vehicle identification number.
    fn vin(&self) -> &str;

    /// Delivers `payload` once. No retries.
    async fn send(&self, payload: Bytes) -> Result<()>;

    /// Stream of response payloads.
    fn receive(&self) -> Responses;

    /// Releases the transport. Idempotent.
    async fn close(&self);

    /// Authentication method hint.
    fn preferred_auth_method(&self) -> AuthMethod;

    /// Retry interval hint.
    fn retry_interval(&self) -> Duration;
}

#[async_trait]
impl VehicleTransport for Connector {
    fn vin(&self) -> &str {
        Connector::vin(self).as_str()
    }

    async fn send(&self, payload: Bytes) -> Result<()> {
        Connector::send(self, payload).await.map(|_| ())
    }

    fn receive(&self) -> Responses {
        self.responses()
    }

    async fn close(&self) {
        Connector::close(self).await;
    }

    fn preferred_auth_method(&self) -> AuthMethod {
        Connector::preferred_auth_method(self)
    }

    fn retry_interval(&self) -> Duration {
        Connector::retry_interval(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
