//! End-to-end connector behavior against an in-process signaling endpoint.

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use hermes_connector::protocol::{CommandType, StatusCode};
use hermes_connector::{
    AuthMethod, Connector, ConnectorConfig, ConnectorState, Error, VehicleTransport,
};
use tokio::time::timeout;

use common::{FakeEndpoint, USER_TOKEN, VEHICLE_TOKEN, VIN, WAIT, inbound, response};

// ============================================================================
// Establishment
// ============================================================================

#[tokio::test]
async fn test_connect_sends_user_token_header() {
    let endpoint = FakeEndpoint::bind().await;
    let (peer, connector) = endpoint.connect().await;

    assert_eq!(peer.user_token.as_deref(), Some(USER_TOKEN));
    assert_eq!(connector.vin().as_str(), VIN);
    assert_eq!(connector.state(), ConnectorState::Open);

    connector.close().await;
}

#[tokio::test]
async fn test_dial_failure_returns_error() {
    let config = ConnectorConfig::builder()
        .server_url("ws://127.0.0.1:1/v1/mobile")
        .build()
        .unwrap();

    let err = Connector::connect(config, VIN, USER_TOKEN, VEHICLE_TOKEN)
        .await
        .unwrap_err();

    assert!(err.is_connection_error(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_connect_fails_when_remote_closes_immediately() -> anyhow::Result<()> {
    let endpoint = FakeEndpoint::bind().await;

    let (peer, connector) = tokio::join!(
        endpoint.accept_and_close(),
        Connector::connect(endpoint.config(), VIN, USER_TOKEN, VEHICLE_TOKEN)
    );
    let _peer = peer?;

    let err = connector.unwrap_err();
    assert!(matches!(err, Error::Connection { .. }), "unexpected error: {err}");
    assert!(err.to_string().contains("closed by remote"));
    Ok(())
}

// ============================================================================
// Send Path
// ============================================================================

#[tokio::test]
async fn test_send_writes_command_envelope() {
    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;

    let txid = connector.send(&b"ping"[..]).await.unwrap();
    let command = peer.recv_command().await;

    assert_eq!(command.transaction_id(), txid);
    assert_eq!(&command.payload[..], b"ping");
    assert_eq!(
        &command.topic[..],
        format!("vehicle_device.{VIN}.cmds").as_bytes()
    );
    assert_eq!(command.expiry.map(|e| e.seconds), Some(10));
    assert_eq!(
        command.options.map(|o| o.token),
        Some(Bytes::from_static(VEHICLE_TOKEN.as_bytes()))
    );
    assert!(command.request_txid.is_empty());
    assert_eq!(connector.stats().commands_sent, 1);

    connector.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sends_never_interleave() {
    const SENDERS: u8 = 32;
    const PAYLOAD_LEN: usize = 16 * 1024;

    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;
    let connector = Arc::new(connector);

    let mut tasks = Vec::new();
    for n in 0..SENDERS {
        let connector = Arc::clone(&connector);
        tasks.push(tokio::spawn(async move {
            connector.send(vec![n; PAYLOAD_LEN]).await.unwrap()
        }));
    }

    // Read while the senders run so the socket buffer never fills up.
    let mut received = HashSet::new();
    let mut seen_payloads = HashSet::new();
    for _ in 0..SENDERS {
        let command = peer.recv_command().await;
        assert!(received.insert(command.transaction_id()), "transaction id reused");

        assert_eq!(command.payload.len(), PAYLOAD_LEN);
        let first = command.payload[0];
        assert!(command.payload.iter().all(|b| *b == first));
        assert!(seen_payloads.insert(first));
    }

    let mut sent = HashSet::new();
    for task in tasks {
        sent.insert(task.await.unwrap());
    }
    assert_eq!(sent, received);

    connector.close().await;
}

// ============================================================================
// Read Loop and Acknowledgments
// ============================================================================

#[tokio::test]
async fn test_ping_pong_delivers_response_and_acks_once() {
    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;
    let responses = connector.responses();

    connector.send(&b"ping"[..]).await.unwrap();
    let command = peer.recv_command().await;
    assert_eq!(&command.payload[..], b"ping");

    peer.send(response("remote-1", b"pong")).await;

    let payload = timeout(WAIT, responses.recv())
        .await
        .expect("response should arrive")
        .expect("queue should be open");
    assert_eq!(&payload[..], b"pong");

    let ack = peer.recv_command().await;
    assert!(ack.is_client_ack());
    assert_eq!(&ack.request_txid[..], b"remote-1");
    assert!(ack.payload.is_empty());
    assert_ne!(&ack.txid[..], b"remote-1");

    peer.expect_silence().await;

    let stats = connector.stats();
    assert_eq!(stats.frames_received, 1);
    assert_eq!(stats.acks_sent, 1);
    assert_eq!(stats.responses_delivered, 1);

    connector.close().await;
}

#[tokio::test]
async fn test_unrecognized_status_is_acked_but_not_delivered() {
    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;

    peer.send(inbound("remote-2", 99, CommandType::SignedCommandResponse, b""))
        .await;

    let ack = peer.recv_command().await;
    assert!(ack.is_client_ack());
    assert_eq!(&ack.request_txid[..], b"remote-2");

    assert!(connector.responses().try_recv().is_none());
    assert_eq!(connector.stats().status_failures, 1);
    assert_eq!(connector.stats().responses_delivered, 0);

    peer.expect_silence().await;
    connector.close().await;
}

#[tokio::test]
async fn test_error_status_is_acked_but_not_delivered() {
    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;

    peer.send(inbound(
        "remote-3",
        StatusCode::ApplicationError as i32,
        CommandType::SignedCommandResponse,
        b"denied",
    ))
    .await;

    let ack = peer.recv_command().await;
    assert_eq!(&ack.request_txid[..], b"remote-3");
    assert!(connector.responses().try_recv().is_none());

    connector.close().await;
}

#[tokio::test]
async fn test_non_response_frames_are_acked_not_delivered() {
    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;

    peer.send(inbound(
        "server-ack",
        StatusCode::ServerAck as i32,
        CommandType::Unknown,
        b"",
    ))
    .await;

    let ack = peer.recv_command().await;
    assert_eq!(&ack.request_txid[..], b"server-ack");
    assert!(connector.responses().try_recv().is_none());
    assert_eq!(connector.stats().status_failures, 0);

    connector.close().await;
}

#[tokio::test]
async fn test_undecodable_frame_is_skipped_and_loop_continues() {
    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;

    peer.send_raw(Bytes::from_static(&[0xff, 0xff, 0xff])).await;
    peer.send(response("remote-4", b"after-garbage")).await;

    let ack = peer.recv_command().await;
    assert_eq!(&ack.request_txid[..], b"remote-4");

    let payload = timeout(WAIT, connector.responses().recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(&payload[..], b"after-garbage");

    peer.expect_silence().await;
    assert_eq!(connector.stats().decode_failures, 1);
    assert_eq!(connector.stats().frames_received, 2);

    connector.close().await;
}

#[tokio::test]
async fn test_acks_follow_arrival_order() {
    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;

    let ids = ["a", "b", "c", "d"];
    for id in ids {
        peer.send(inbound(id, StatusCode::Ok as i32, CommandType::Unknown, b""))
            .await;
    }

    for id in ids {
        let ack = peer.recv_command().await;
        assert_eq!(&ack.request_txid[..], id.as_bytes());
    }

    connector.close().await;
}

// ============================================================================
// Delivery Queue
// ============================================================================

#[tokio::test]
async fn test_full_inbox_keeps_oldest_and_reports_overflow() {
    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;

    for n in 0..6u8 {
        peer.send(response(&format!("remote-{n}"), &[n])).await;
    }

    // Every frame is acked even when its payload is dropped.
    for n in 0..6u8 {
        let ack = peer.recv_command().await;
        assert_eq!(&ack.request_txid[..], format!("remote-{n}").as_bytes());
    }

    let responses = connector.responses();
    assert_eq!(responses.len(), 5);

    let stats = connector.stats();
    assert_eq!(stats.responses_delivered, 5);
    assert_eq!(stats.responses_dropped, 1);

    for n in 0..5u8 {
        assert_eq!(responses.try_recv(), Some(Bytes::from(vec![n])));
    }
    assert!(responses.try_recv().is_none());

    connector.close().await;
}

#[tokio::test]
async fn test_custom_inbox_capacity() {
    let endpoint = FakeEndpoint::bind().await;
    let config = ConnectorConfig::builder()
        .server_url(endpoint.url())
        .inbox_capacity(1)
        .build()
        .unwrap();
    let (mut peer, connector) = endpoint.connect_with(config).await;

    peer.send(response("first", b"1")).await;
    peer.send(response("second", b"2")).await;
    peer.recv_command().await;
    peer.recv_command().await;

    assert_eq!(connector.responses().try_recv(), Some(Bytes::from_static(b"1")));
    assert_eq!(connector.stats().responses_dropped, 1);

    connector.close().await;
}

// ============================================================================
// Close
// ============================================================================

#[tokio::test]
async fn test_close_is_idempotent_and_drains_queue() {
    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;
    let responses = connector.responses();

    peer.send(response("pending-1", b"x")).await;
    peer.send(response("pending-2", b"y")).await;
    peer.recv_command().await;
    peer.recv_command().await;
    assert_eq!(responses.len(), 2);

    connector.close().await;
    connector.close().await;

    assert!(connector.is_closed());
    assert_eq!(connector.state(), ConnectorState::Closed);
    assert!(responses.is_empty());
    assert_eq!(timeout(WAIT, responses.recv()).await.unwrap(), None);
}

#[tokio::test]
async fn test_send_after_close_fails() {
    let endpoint = FakeEndpoint::bind().await;
    let (_peer, connector) = endpoint.connect().await;

    connector.close().await;

    let err = connector.send(&b"late"[..]).await.unwrap_err();
    assert!(matches!(err, Error::ConnectionClosed));
}

#[tokio::test]
async fn test_waiting_consumer_released_by_close() {
    let endpoint = FakeEndpoint::bind().await;
    let (_peer, connector) = endpoint.connect().await;
    let connector = Arc::new(connector);

    let waiter = tokio::spawn({
        let responses = connector.responses();
        async move { responses.recv().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    timeout(WAIT, connector.close()).await.expect("close should not deadlock");
    assert_eq!(timeout(WAIT, waiter).await.unwrap().unwrap(), None);
}

#[tokio::test]
async fn test_remote_close_ends_session() {
    let endpoint = FakeEndpoint::bind().await;
    let (mut peer, connector) = endpoint.connect().await;
    let mut health = connector.health();

    peer.close().await;

    timeout(WAIT, health.wait_for(|state| !state.is_open()))
        .await
        .expect("state should change")
        .expect("health channel open");

    assert_eq!(connector.state(), ConnectorState::Closed);
    assert_eq!(timeout(WAIT, connector.responses().recv()).await.unwrap(), None);

    let err = connector.send(&b"after-close"[..]).await.unwrap_err();
    assert!(matches!(err, Error::ConnectionClosed));

    connector.close().await;
}

#[tokio::test]
async fn test_abrupt_drop_marks_failed() {
    let endpoint = FakeEndpoint::bind().await;
    let (peer, connector) = endpoint.connect().await;
    let mut health = connector.health();

    drop(peer);

    timeout(WAIT, health.wait_for(|state| !state.is_open()))
        .await
        .expect("state should change")
        .expect("health channel open");

    assert!(connector.state().is_failed(), "state: {:?}", connector.state());
    assert_eq!(timeout(WAIT, connector.responses().recv()).await.unwrap(), None);
    assert!(matches!(
        connector.send(&b"after-drop"[..]).await,
        Err(Error::ConnectionClosed)
    ));

    connector.close().await;
}

// ============================================================================
// Session Layer Contract
// ============================================================================

#[tokio::test]
async fn test_vehicle_transport_contract() {
    let endpoint = FakeEndpoint::bind().await;
    let config = ConnectorConfig::builder()
        .server_url(endpoint.url())
        .retry_interval(Duration::from_millis(750))
        .auth_method(AuthMethod::Gcm)
        .build()
        .unwrap();
    let (mut peer, connector) = endpoint.connect_with(config).await;
    let transport: Box<dyn VehicleTransport> = Box::new(connector);

    assert_eq!(transport.vin(), VIN);
    assert_eq!(transport.retry_interval(), Duration::from_millis(750));
    assert_eq!(transport.preferred_auth_method(), AuthMethod::Gcm);

    transport.send(Bytes::from_static(b"hello")).await.unwrap();
    assert_eq!(&peer.recv_command().await.payload[..], b"hello");

    peer.send(response("remote-5", b"world")).await;
    let payload = timeout(WAIT, transport.receive().recv()).await.unwrap().unwrap();
    assert_eq!(&payload[..], b"world");

    transport.close().await;
    transport.close().await;
    assert_eq!(timeout(WAIT, transport.receive().recv()).await.unwrap(), None);
}
