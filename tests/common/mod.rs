//! Shared helpers for integration tests.
//!
//! Provides an in-process signaling endpoint:
//! - Binds a WebSocket server on a random localhost port
//! - Captures the user token sent on the upgrade
//! - Decodes and emits Hermes envelopes

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use hermes_connector::protocol::{CommandMessage, CommandType, HermesMessage, StatusCode};
use hermes_connector::{Connector, ConnectorConfig};
use parking_lot::Mutex;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

// ============================================================================
// Constants
// ============================================================================

pub const VIN: &str = "5YJ3E1EA7KF000000";
pub const USER_TOKEN: &str = "user-jwt";
pub const VEHICLE_TOKEN: &str = "vehicle-jwt";

/// Upper bound for anything the tests wait on.
pub const WAIT: Duration = Duration::from_secs(5);

/// Window in which no further frame may arrive.
pub const QUIET: Duration = Duration::from_millis(300);

// ============================================================================
// FakeEndpoint
// ============================================================================

/// Stand-in for the signaling server.
pub struct FakeEndpoint {
    listener: TcpListener,
    url: String,
}

impl FakeEndpoint {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let port = listener.local_addr().expect("local addr").port();

        Self {
            listener,
            url: format!("ws://127.0.0.1:{port}/v1/mobile"),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> ConnectorConfig {
        ConnectorConfig::builder()
            .server_url(self.url.clone())
            .build()
            .expect("valid config")
    }

    /// Accepts one connection and completes the upgrade.
    pub async fn accept(&self) -> Peer {
        self.try_accept().await.expect("accept should succeed")
    }

    /// Accepts one connection, reporting failures instead of panicking.
    pub async fn try_accept(&self) -> anyhow::Result<Peer> {
        let (stream, _) = timeout(WAIT, self.listener.accept())
            .await
            .context("connector did not dial")?
            .context("TCP accept failed")?;

        let captured = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&captured);
        let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            *slot.lock() = req
                .headers()
                .get("x-jwt")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Ok(resp)
        };

        let ws = tokio_tungstenite::accept_hdr_async(stream, callback)
            .await
            .context("WebSocket upgrade failed")?;

        let user_token = captured.lock().take();
        Ok(Peer { ws, user_token })
    }

    /// Accepts one connection and immediately closes it.
    pub async fn accept_and_close(&self) -> anyhow::Result<Peer> {
        let mut peer = self.try_accept().await?;
        peer.ws.close(None).await.context("close frame write failed")?;
        Ok(peer)
    }

    /// Connects a connector and accepts it on this endpoint.
    pub async fn connect(&self) -> (Peer, Connector) {
        self.connect_with(self.config()).await
    }

    pub async fn connect_with(&self, config: ConnectorConfig) -> (Peer, Connector) {
        let (peer, connector) = tokio::join!(
            self.accept(),
            Connector::connect(config, VIN, USER_TOKEN, VEHICLE_TOKEN)
        );
        (peer, connector.expect("connect should succeed"))
    }
}

// ============================================================================
// Peer
// ============================================================================

/// Server side of one accepted connection.
pub struct Peer {
    ws: WebSocketStream<TcpStream>,
    /// Value of the `X-Jwt` header on the upgrade.
    pub user_token: Option<String>,
}

impl Peer {
    /// Waits for the next envelope from the connector.
    pub async fn recv_command(&mut self) -> CommandMessage {
        loop {
            let message = timeout(WAIT, self.ws.next())
                .await
                .expect("frame should arrive")
                .expect("stream should be open")
                .expect("read should succeed");

            match message {
                Message::Binary(data) => {
                    return HermesMessage::decode_command(data).expect("valid envelope");
                }
                Message::Ping(_) | Message::Pong(_) => continue,
                other => panic!("unexpected message: {other:?}"),
            }
        }
    }

    /// Asserts that no envelope arrives for a short while.
    pub async fn expect_silence(&mut self) {
        loop {
            match timeout(QUIET, self.ws.next()).await {
                Err(_) => return,
                Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
                Ok(Some(Ok(Message::Binary(data)))) => {
                    panic!(
                        "unexpected envelope: {:?}",
                        HermesMessage::decode_command(data)
                    )
                }
                Ok(other) => panic!("unexpected stream item: {other:?}"),
            }
        }
    }

    pub async fn send(&mut self, envelope: HermesMessage) {
        self.send_raw(envelope.to_frame()).await;
    }

    pub async fn send_raw(&mut self, frame: Bytes) {
        self.ws
            .send(Message::Binary(frame))
            .await
            .expect("server write should succeed");
    }

    pub async fn close(&mut self) {
        self.ws.close(None).await.expect("close should succeed");
    }
}

// ============================================================================
// Envelope Builders
// ============================================================================

/// Builds an inbound envelope as the signaling server would.
pub fn inbound(txid: &str, status: i32, command_type: CommandType, payload: &[u8]) -> HermesMessage {
    let mut command = CommandMessage {
        txid: Bytes::copy_from_slice(txid.as_bytes()),
        topic: Bytes::from_static(b"client.responses"),
        payload: Bytes::copy_from_slice(payload),
        status_code: status,
        ..Default::default()
    };
    command.set_command_type(command_type);

    HermesMessage {
        command_message: Some(command),
    }
}

/// Successful signed-command response.
pub fn response(txid: &str, payload: &[u8]) -> HermesMessage {
    inbound(
        txid,
        StatusCode::Ok as i32,
        CommandType::SignedCommandResponse,
        payload,
    )
}
