//! Hermes connector - vehicle command transport over the Hermes signaling socket.
//!
//! This library relays opaque command/response payloads between a command
//! session layer and a vehicle, over a persistent authenticated WebSocket to
//! the Hermes signaling endpoint.
//!
//! # Architecture
//!
//! ```text
//! session layer ──send(bytes)──► Connector ──command envelope──► signaling
//!       ▲                          │   ▲                           endpoint
//!       │                          │   └──────ack envelope──────────┘ ▲
//!       └──responses()◄── queue ◄──┴─ read loop ◄──response envelope──┘
//! ```
//!
//! Key design principles:
//!
//! - One background read task per connector owns the socket's read half
//! - Every inbound envelope is acknowledged, whatever its status
//! - Command sends and acks share one write lock, so frames never interleave
//! - Response delivery is best-effort: a full queue drops the newest payload
//! - No retries anywhere; callers get a retry interval hint instead
//!
//! # Quick Start
//!
//! ```no_run
//! use hermes_connector::{Connector, ConnectorConfig, OwnerApi, Result, Vin};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let owner_token = std::fs::read_to_string("owner-token.txt")?;
//!     let vin = Vin::new("5YJ3E1EA7KF000000");
//!
//!     let api = OwnerApi::new()?;
//!     let user_token = api.fetch_user_token(&owner_token).await?;
//!     let vehicle_token = api.fetch_vehicle_token(&owner_token, &vin).await?;
//!
//!     let connector =
//!         Connector::connect(ConnectorConfig::default(), vin, &user_token, &vehicle_token)
//!             .await?;
//!
//!     connector.send(b"signed session-layer bytes".to_vec()).await?;
//!     if let Some(response) = connector.responses().recv().await {
//!         println!("received {} bytes", response.len());
//!     }
//!
//!     connector.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`connector`] | [`Connector`], configuration, delivery queue, health |
//! | [`contract`] | [`VehicleTransport`] trait for the session layer |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | [`TransactionId`] and [`Vin`] |
//! | [`protocol`] | Protobuf envelope types (internal) |
//! | [`token`] | Owner API token client |
//! | [`transport`] | WebSocket dial and write lock (internal) |

// ============================================================================
// Modules
// ============================================================================

/// The Hermes connector.
///
/// Use [`Connector::connect`] to open a session.
pub mod connector;

/// Contract with the session/command layer.
pub mod contract;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Hermes wire protocol types.
///
/// Internal module defining the protobuf envelopes.
pub mod protocol;

/// Owner API token client.
pub mod token;

/// WebSocket transport layer.
///
/// Internal module handling the socket and the write lock.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Connector types
pub use connector::{
    Connector, ConnectorConfig, ConnectorConfigBuilder, ConnectorState, ConnectorStats,
    Responses, StatsSnapshot,
};

// Contract types
pub use contract::{AuthMethod, VehicleTransport};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{TransactionId, Vin};

// Token client
pub use token::OwnerApi;
