//! Dialing the signaling endpoint.
//!
//! The user-level token rides on the upgrade request as a custom header.
//! The returned stream is split so the read loop owns the source exclusively
//! while writers share the sink through [`FrameWriter`](super::FrameWriter).

// ============================================================================
// Imports
// ============================================================================

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// Concrete client stream type.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of the signaling socket.
pub type WsSink = SplitSink<WsStream, Message>;

/// Read half of the signaling socket.
pub type WsSource = SplitStream<WsStream>;

// ============================================================================
// Dial
// ============================================================================

/// Opens the signaling socket with `token` attached under `header`.
///
/// # Errors
///
/// - [`Error::InvalidHeader`] if the header name or token is not a valid
///   HTTP header
/// - [`Error::Connection`] if the URL is invalid or the upgrade fails
pub async fn dial(url: &str, header: &str, token: &str) -> Result<(WsSink, WsSource)> {
    let mut request = url
        .into_client_request()
        .map_err(|e| Error::connection(format!("invalid WebSocket URL {url}: {e}")))?;

    let name = HeaderName::from_bytes(header.as_bytes())
        .map_err(|e| Error::invalid_header(header, e.to_string()))?;
    let mut value =
        HeaderValue::from_str(token.trim()).map_err(|e| Error::invalid_header(header, e.to_string()))?;
    value.set_sensitive(true);
    request.headers_mut().insert(name, value);

    debug!(url, "Opening signaling socket");

    let (ws_stream, response) = connect_async(request)
        .await
        .map_err(|e| Error::connection(format!("WebSocket dial failed: {e}")))?;

    debug!(status = %response.status(), "Signaling socket open");

    Ok(ws_stream.split())
}

// ============================================================================
// Tests
// ============================================================================
