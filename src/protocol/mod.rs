//! Hermes wire protocol types.
//!
//! Every WebSocket frame exchanged with the signaling endpoint is a
//! protobuf-encoded [`HermesMessage`] wrapping one [`CommandMessage`].
//!
//! # Protocol Overview
//!
//! | Envelope | Direction | Purpose |
//! |----------|-----------|---------|
//! | command | Local → Remote | Opaque session-layer payload for the vehicle |
//! | acknowledgment | Local → Remote | Confirms receipt of an inbound envelope |
//! | response | Remote → Local | Signed-command response carrying a payload |
//! | server ack / status | Remote → Local | Liveness and delivery status |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `envelope` | Envelope messages and constructors |
//! | `routable` | Diagnostic view of session-layer payloads |
//! | `status` | Status codes and command types |

// ============================================================================
// Submodules
// ============================================================================

/// Envelope messages and constructors.
pub mod envelope;

/// Diagnostic decoding of session-layer payloads.
pub mod routable;

/// Status codes and command type discriminators.
pub mod status;

// ============================================================================
// Re-exports
// ============================================================================

pub use envelope::{CommandMessage, HermesMessage, MessageOptions, Timestamp};
pub use routable::RoutableMessage;
pub use status::{CommandType, StatusCode};
