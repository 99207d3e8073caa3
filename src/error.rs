//! Error types for the Hermes connector.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use hermes_connector::{Connector, Result};
//!
//! async fn example(connector: &Connector) -> Result<()> {
//!     connector.send(&b"ping"[..]).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidHeader`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`] |
//! | Frame | [`Error::Decode`], [`Error::MissingCommand`], [`Error::Status`] |
//! | Delivery | [`Error::InboxFull`] |
//! | Token | [`Error::Token`], [`Error::Http`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when connector configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// A token or header name could not be placed in the upgrade request.
    #[error("Invalid header {name}: {message}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Why the header was rejected.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    ///
    /// Returned when the signaling socket cannot be established, or when the
    /// read loop died before establishment returned.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// The connector was closed, locally or by the remote end.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Frame Errors
    // ========================================================================
    /// Inbound frame or payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Inbound envelope carried no command message.
    #[error("Envelope carries no command message")]
    MissingCommand,

    /// Remote endpoint reported a status outside the success/ack set.
    #[error("Received status not OK: {code}")]
    Status {
        /// Raw status code from the frame.
        code: i32,
    },

    // ========================================================================
    // Delivery Errors
    // ========================================================================
    /// The delivery queue was full and a response was dropped.
    #[error("Dropped response due to full inbox (capacity {capacity})")]
    InboxFull {
        /// Capacity of the delivery queue.
        capacity: usize,
    },

    // ========================================================================
    // Token Errors
    // ========================================================================
    /// Owner API rejected a token request.
    #[error("Token request failed: {message}")]
    Token {
        /// Description of the token failure.
        message: String,
    },

    /// HTTP transport error talking to the owner API.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid header error.
    #[inline]
    pub fn invalid_header(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[inline]
    pub fn status(code: i32) -> Self {
        Self::Status { code }
    }

    /// Creates an inbox full error.
    #[inline]
    pub fn inbox_full(capacity: usize) -> Self {
        Self::InboxFull { capacity }
    }

    /// Creates a token error.
    #[inline]
    pub fn token(message: impl Into<String>) -> Self {
        Self::Token {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionClosed | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error is scoped to a single frame.
    ///
    /// Frame errors never terminate the read loop.
    #[inline]
    #[must_use]
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::MissingCommand | Self::Status { .. } | Self::InboxFull { .. }
        )
    }

    /// Returns `true` if a caller may reasonably retry the operation.
    ///
    /// The connector never retries on its own; see
    /// [`Connector::retry_interval`](crate::Connector::retry_interval).
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::WebSocket(_) | Self::Io(_) | Self::Http(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
