//! WebSocket transport layer.
//!
//! This module handles the socket to the Hermes signaling endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Connector      │                              │  Signaling      │
//! │                 │      WebSocket (binary)      │  endpoint       │
//! │  FrameWriter ───┼─────────────────────────────►│                 │
//! │  read loop   ◄──┼──────────────────────────────│                 │
//! └─────────────────┘        X-Jwt on upgrade      └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `socket` | Dialing with the user token header |
//! | `writer` | Write lock around the socket's sink |

// ============================================================================
// Submodules
// ============================================================================

/// Dialing the signaling endpoint.
pub mod socket;

/// Serialized frame writer.
pub mod writer;

// ============================================================================
// Re-exports
// ============================================================================

pub use socket::{WsSink, WsSource, WsStream, dial};
pub use writer::FrameWriter;
