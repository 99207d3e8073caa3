//! The Hermes signaling connector.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Connector`] | Establish, send, receive, close |
//! | [`ConnectorConfig`] | Endpoint and tuning, built with [`ConnectorConfigBuilder`] |
//! | [`Responses`] | Read-only handle to the bounded delivery queue |
//! | [`ConnectorState`] | Lifecycle state published on a watch channel |
//! | [`StatsSnapshot`] | Per-frame counters (drops, decode failures, acks) |
//!
//! # Example
//!
//! ```no_run
//! use hermes_connector::{Connector, ConnectorConfig, Result};
//!
//! # async fn example() -> Result<()> {
//! let connector = Connector::connect(
//!     ConnectorConfig::default(),
//!     "5YJ3E1EA7KF000000",
//!     "user-jwt",
//!     "vehicle-jwt",
//! )
//! .await?;
//!
//! connector.send(b"session-layer bytes".to_vec()).await?;
//! if let Some(payload) = connector.responses().recv().await {
//!     println!("{} byte response", payload.len());
//! }
//!
//! connector.close().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Connector configuration and builder.
pub mod config;

/// The connector itself.
pub mod core;

/// Lifecycle state and counters.
pub mod health;

/// Bounded delivery queue.
pub mod inbox;

/// Background read loop.
mod reader;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ConnectorConfig, ConnectorConfigBuilder};
pub use self::core::Connector;
pub use health::{ConnectorState, ConnectorStats, StatsSnapshot};
pub use inbox::Responses;
