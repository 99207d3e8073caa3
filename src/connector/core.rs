//! The Hermes connector.
//!
//! Owns one signaling session: the socket, the write lock, the read task,
//! and the delivery queue.
//!
//! # Lifecycle
//!
//! 1. [`Connector::connect`] dials, spawns the read loop, checks health
//! 2. [`Connector::send`] writes command envelopes
//! 3. [`Connector::responses`] drains response payloads
//! 4. [`Connector::close`] releases everything, once

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

use crate::contract::AuthMethod;
use crate::error::{Error, Result};
use crate::identifiers::{TransactionId, Vin};
use crate::protocol::HermesMessage;
use crate::transport::{FrameWriter, dial};

use super::config::ConnectorConfig;
use super::health::{ConnectorState, Health, StatsSnapshot};
use super::inbox::{Inbox, Responses};
use super::reader::ReadLoop;

// ============================================================================
// Constants
// ============================================================================

/// Upper bound on the close handshake write.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Connector
// ============================================================================

/// Transport connector relaying opaque command payloads to one vehicle.
///
/// Sends are single-attempt; the connector never retries. Responses are
/// delivered best-effort through a bounded queue: when the consumer falls
/// behind, new responses are dropped so acknowledgments keep flowing.
///
/// # Thread Safety
///
/// `Connector` is `Send + Sync`. Concurrent [`send`](Self::send) calls are
/// serialized by the write lock shared with the read loop's acks.
pub struct Connector {
    /// Vehicle this session talks to.
    vin: Vin,
    /// Settings the session was opened with.
    config: ConnectorConfig,
    /// Device-level token attached to every command.
    vehicle_token: Bytes,
    /// Write half of the socket.
    writer: Arc<FrameWriter>,
    /// Producer side of the delivery queue.
    inbox: Arc<Inbox>,
    /// Consumer side of the delivery queue.
    responses: Responses,
    /// State channel and counters.
    health: Arc<Health>,
    /// Read loop task, taken on close.
    reader: Mutex<Option<JoinHandle<()>>>,
    /// Set by the first `close`.
    closed: AtomicBool,
}

impl Connector {
    /// Opens a signaling session for `vin`.
    ///
    /// `user_token` authenticates the socket upgrade; `vehicle_token` is
    /// attached to every command envelope.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidHeader`] if `user_token` cannot be sent as a header
    /// - [`Error::Connection`] if the dial fails, or the remote closed or the
    ///   read loop failed before this returned
    pub async fn connect(
        config: ConnectorConfig,
        vin: impl Into<Vin>,
        user_token: &str,
        vehicle_token: &str,
    ) -> Result<Self> {
        let vin = vin.into();
        let (sink, source) = dial(config.server_url(), config.auth_header(), user_token).await?;

        let writer = Arc::new(FrameWriter::new(sink));
        let (inbox, responses) = Inbox::new(config.inbox_capacity());
        let inbox = Arc::new(inbox);
        let health = Arc::new(Health::new());

        let reader = tokio::spawn(
            ReadLoop::new(
                source,
                Arc::clone(&writer),
                Arc::clone(&inbox),
                Arc::clone(&health),
            )
            .run(),
        );

        let connector = Self {
            vin,
            config,
            vehicle_token: Bytes::copy_from_slice(vehicle_token.as_bytes()),
            writer,
            inbox,
            responses,
            health,
            reader: Mutex::new(Some(reader)),
            closed: AtomicBool::new(false),
        };

        // Let the read loop observe an immediate close or failure. Best
        // effort: it can still end right after this check.
        tokio::task::yield_now().await;
        let reason = match connector.state() {
            ConnectorState::Open => None,
            ConnectorState::Closed => Some("signaling socket closed by remote".to_string()),
            ConnectorState::Failed { reason } => Some(reason),
        };
        if let Some(reason) = reason {
            connector.close().await;
            return Err(Error::connection(reason));
        }

        info!(vin = %connector.vin, "Hermes connector established");
        Ok(connector)
    }

    /// Wraps `payload` in a command envelope and writes it once.
    ///
    /// Returns the fresh transaction id of the envelope.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connector is closed or dead
    /// - [`Error::WebSocket`] if the write fails
    pub async fn send(&self, payload: impl Into<Bytes>) -> Result<TransactionId> {
        if self.closed.load(Ordering::Acquire) || !self.health.state().is_open() {
            return Err(Error::ConnectionClosed);
        }

        let txid = TransactionId::generate();
        let envelope = HermesMessage::command(
            txid.clone(),
            self.vin.command_topic(),
            payload.into(),
            self.vehicle_token.clone(),
            self.config.command_expiry(),
        );

        self.writer.write(&envelope).await?;
        self.health.stats().record_command();

        debug!(txid = %txid, vin = %self.vin, "Command sent");
        Ok(txid)
    }

    /// Returns a read-only handle to the delivery queue.
    #[inline]
    #[must_use]
    pub fn responses(&self) -> Responses {
        self.responses.clone()
    }

    /// Closes the socket and the delivery queue.
    ///
    /// Safe to call more than once; later calls return immediately.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            trace!("Connector already closed");
            return;
        }

        match timeout(CLOSE_TIMEOUT, self.writer.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "Close handshake failed"),
            Err(_) => warn!("Close handshake timed out"),
        }

        if let Some(reader) = self.reader.lock().take() {
            reader.abort();
        }

        self.inbox.close();
        let discarded = self.responses.close_and_drain().await;
        self.health.mark_closed();

        debug!(vin = %self.vin, discarded, "Hermes connector closed");
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

// ============================================================================
// Connector - Accessors
// ============================================================================

impl Connector {
    /// Vehicle identification number.
    #[inline]
    #[must_use]
    pub fn vin(&self) -> &Vin {
        &self.vin
    }

    /// Configuration the session was opened with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Authentication method the session layer should use.
    #[inline]
    #[must_use]
    pub fn preferred_auth_method(&self) -> AuthMethod {
        self.config.auth_method()
    }

    /// Interval callers should wait before retrying a failed exchange.
    #[inline]
    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        self.config.retry_interval()
    }

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectorState {
        self.health.state()
    }

    /// Subscribes to lifecycle state changes.
    #[inline]
    #[must_use]
    pub fn health(&self) -> watch::Receiver<ConnectorState> {
        self.health.subscribe()
    }

    /// Per-frame counters.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.health.stats().snapshot()
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("vin", &self.vin)
            .field("server_url", &self.config.server_url())
            .field("state", &self.health.state())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Drop for Connector {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.get_mut().take() {
            reader.abort();
        }
    }
}
