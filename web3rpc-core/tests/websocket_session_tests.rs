// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for network::websocket

mod common;

use std::time::Duration;

use tungstenite::protocol::frame::coding::{Control, Data, OpCode};
use web3rpc_core::network::*;

use common::frames::{
    server_binary_fragment, server_close, server_frame, server_ping, server_text,
    server_text_fragment,
};
use common::{client_frames, open_ws_session, WSS_URL};

fn connect_with(
    transport: MockTransport,
    config: &TransportConfig,
    sleeper: &MockSleeper,
) -> TransportResult<WebSocketSession<MockTransport>> {
    let connector = MockConnector::new();
    connector.push_transport(transport);
    WebSocketSession::connect(
        &connector,
        &Endpoint::parse(WSS_URL).unwrap(),
        config,
        "web3rpc-test",
        sleeper,
    )
}

/// Transport delivering an upgrade response head that never ends.
fn trickling_transport(reads: usize) -> MockTransport {
    let transport = MockTransport::new();
    transport.queue_data(b"HTTP/1.1 101 Switching Protocols\r\nX-Padding: ".to_vec());
    for _ in 1..reads {
        transport.queue_data(b"a".to_vec());
    }
    transport
}

// ============================================================
// Handshake
// ============================================================

#[test]
fn test_handshake_sends_upgrade_request() {
    let (session, transport) = open_ws_session();

    assert_eq!(session.state(), SessionState::Open);
    let request = String::from_utf8(transport.sent()[0].clone()).unwrap();
    assert!(request.starts_with("GET /ws HTTP/1.1\r\n"));
    assert!(request.contains("Host: node.example.com\r\n"));
    assert!(request.contains("User-Agent: web3rpc-test\r\n"));
}

#[test]
fn test_handshake_timeout_after_poll_budget() {
    // A server that trickles bytes but never completes the upgrade response
    let transport = trickling_transport(30);
    let sleeper = MockSleeper::new();

    let result = connect_with(transport.clone(), &TransportConfig::default(), &sleeper);

    assert!(matches!(result, Err(NetworkError::HandshakeTimeout)));
    assert_eq!(sleeper.sleeps().len(), 20);
    assert!(sleeper.sleeps().iter().all(|d| *d == Duration::from_millis(400)));
    assert_eq!(sleeper.total(), Duration::from_secs(8));
    assert_eq!(transport.close_calls(), 1);
}

#[test]
fn test_handshake_read_timeout_is_handshake_timeout() {
    let transport = MockTransport::new();
    let sleeper = MockSleeper::new();

    let result = connect_with(transport.clone(), &TransportConfig::default(), &sleeper);

    assert!(matches!(result, Err(NetworkError::HandshakeTimeout)));
    assert_eq!(transport.close_calls(), 1);
}

#[test]
fn test_handshake_rejected() {
    let transport = MockTransport::new();
    transport.queue_data(b"HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\n\r\n".to_vec());

    let result = connect_with(transport.clone(), &TransportConfig::default(), &MockSleeper::new());

    assert!(matches!(
        result,
        Err(NetworkError::HandshakeRejected { status: 403 })
    ));
    assert_eq!(transport.close_calls(), 1);
}

#[test]
fn test_handshake_peer_closes() {
    let transport = MockTransport::new();
    transport.queue_read(MockRead::Closed);

    let result = connect_with(transport.clone(), &TransportConfig::default(), &MockSleeper::new());

    assert!(matches!(result, Err(NetworkError::ConnectionClosed)));
    assert_eq!(transport.close_calls(), 1);
}

#[test]
fn test_handshake_cycles_follow_config() {
    let transport = trickling_transport(10);
    let sleeper = MockSleeper::new();
    let config = TransportConfig::default()
        .with_handshake_timeout_ms(1_000)
        .with_handshake_poll_ms(250);

    let result = connect_with(transport, &config, &sleeper);

    assert!(matches!(result, Err(NetworkError::HandshakeTimeout)));
    assert_eq!(sleeper.sleeps().len(), 4);
}

#[test]
fn test_connect_rejects_https_endpoint() {
    let connector = MockConnector::new();
    let result = WebSocketSession::connect(
        &connector,
        &Endpoint::parse("https://node.example.com").unwrap(),
        &TransportConfig::default(),
        "web3rpc-test",
        &MockSleeper::new(),
    );

    assert!(matches!(result, Err(NetworkError::InvalidEndpoint(_))));
    assert_eq!(connector.open_count(), 0);
}

#[test]
fn test_connect_failure_propagates() {
    let connector = MockConnector::new();
    connector.push_failure(NetworkError::ConnectionFailed("dns".into()));

    let result = WebSocketSession::connect(
        &connector,
        &Endpoint::parse(WSS_URL).unwrap(),
        &TransportConfig::default(),
        "web3rpc-test",
        &MockSleeper::new(),
    );

    assert!(matches!(result, Err(NetworkError::ConnectionFailed(_))));
}

// ============================================================
// Messages
// ============================================================

#[test]
fn test_send_message_writes_masked_text_frame() {
    let (mut session, transport) = open_ws_session();

    session.send_message(br#"{"id":1}"#).unwrap();

    let frames = client_frames(&transport);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].opcode, OpCode::Data(Data::Text));
    assert!(frames[0].masked);
    assert!(frames[0].is_final);
    assert_eq!(frames[0].payload, br#"{"id":1}"#);
}

#[test]
fn test_send_non_utf8_goes_out_as_binary() {
    let (mut session, transport) = open_ws_session();

    session.send_message(&[0xff, 0xfe]).unwrap();

    assert_eq!(client_frames(&transport)[0].opcode, OpCode::Data(Data::Binary));
}

#[test]
fn test_receive_complete_text_message() {
    let (mut session, transport) = open_ws_session();
    transport.queue_data(server_text("hello"));

    session.get_messages().unwrap();

    assert_eq!(session.pending(), 1);
    assert_eq!(
        session.pop_message(),
        Some(InboundMessage::Text("hello".into()))
    );
}

#[test]
fn test_fragments_reassembled_across_reads() {
    let (mut session, transport) = open_ws_session();
    transport.queue_data(server_text_fragment("{\"jsonrpc\":", true, false));
    transport.queue_data(server_text_fragment("\"2.0\",", false, false));
    transport.queue_data(server_text_fragment("\"id\":1}", false, true));

    session.get_messages().unwrap();
    assert_eq!(session.pending(), 0);
    session.get_messages().unwrap();
    assert_eq!(session.pending(), 0);
    session.get_messages().unwrap();

    assert_eq!(
        session.pop_message(),
        Some(InboundMessage::Text("{\"jsonrpc\":\"2.0\",\"id\":1}".into()))
    );
}

#[test]
fn test_utf8_sequence_split_between_fragments() {
    let (mut session, transport) = open_ws_session();
    let bytes = "é".as_bytes();
    let mut chunk = server_frame(OpCode::Data(Data::Text), false, &bytes[..1]);
    chunk.extend(server_frame(
        OpCode::Data(Data::Continue),
        true,
        &bytes[1..],
    ));
    transport.queue_data(chunk);

    session.get_messages().unwrap();

    assert_eq!(session.pop_message(), Some(InboundMessage::Text("é".into())));
}

#[test]
fn test_binary_fragments_reassembled() {
    let (mut session, transport) = open_ws_session();
    let mut chunk = server_binary_fragment(&[1, 2], true, false);
    chunk.extend(server_binary_fragment(&[3], false, true));
    transport.queue_data(chunk);

    session.get_messages().unwrap();

    assert_eq!(session.pop_message(), Some(InboundMessage::Binary(vec![1, 2, 3])));
}

#[test]
fn test_ping_mid_stream_answered_with_pong() {
    let (mut session, transport) = open_ws_session();
    let mut chunk = server_text_fragment("part one ", true, false);
    chunk.extend(server_ping(b"alive?"));
    chunk.extend(server_text_fragment("part two", false, true));
    transport.queue_data(chunk);

    session.get_messages().unwrap();

    let frames = client_frames(&transport);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].opcode, OpCode::Control(Control::Pong));
    assert_eq!(frames[0].payload, b"alive?");
    assert_eq!(session.pending(), 1);
    assert_eq!(
        session.pop_message(),
        Some(InboundMessage::Text("part one part two".into()))
    );
}

#[test]
fn test_pop_message_returns_newest_first() {
    let (mut session, transport) = open_ws_session();
    let mut chunk = server_text("first");
    chunk.extend(server_text("second"));
    transport.queue_data(chunk);

    session.get_messages().unwrap();

    assert_eq!(session.pop_message(), Some(InboundMessage::Text("second".into())));
    assert_eq!(session.discard_pending(), 1);
    assert_eq!(session.pop_message(), None);
}

#[test]
fn test_unsupported_opcode_is_ignored() {
    let (mut session, transport) = open_ws_session();
    let mut chunk = server_frame(OpCode::Data(Data::Reserved(3)), true, b"");
    chunk.extend(server_text("still here"));
    transport.queue_data(chunk);

    session.get_messages().unwrap();

    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(
        session.pop_message(),
        Some(InboundMessage::Text("still here".into()))
    );
}

#[test]
fn test_reserved_control_frame_in_own_read_keeps_session() {
    let (mut session, transport) = open_ws_session();
    transport.queue_data(server_frame(
        OpCode::Control(Control::Reserved(0xC)),
        true,
        b"extension data",
    ));
    transport.queue_data(server_text("next"));

    session.get_messages().unwrap();
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(session.pop_message(), None);
    assert_eq!(transport.close_calls(), 0);

    session.get_messages().unwrap();
    assert_eq!(session.pop_message(), Some(InboundMessage::Text("next".into())));
}

// ============================================================
// Closing
// ============================================================

#[test]
fn test_peer_close_frame_is_reported() {
    let (mut session, transport) = open_ws_session();
    transport.queue_data(server_close(1011, "internal error"));

    let result = session.get_messages();

    assert_eq!(
        result,
        Err(NetworkError::RemoteClosed {
            code: 1011,
            reason: "internal error".into()
        })
    );
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(transport.close_calls(), 1);

    let frames = client_frames(&transport);
    assert_eq!(frames[0].opcode, OpCode::Control(Control::Close));
    assert_eq!(frames[0].payload, 1011u16.to_be_bytes());
}

#[test]
fn test_peer_eof_closes_without_error() {
    let (mut session, transport) = open_ws_session();
    transport.queue_read(MockRead::Closed);

    session.get_messages().unwrap();

    assert_eq!(session.state(), SessionState::Closed);
    assert!(!session.is_open());
    assert_eq!(transport.close_calls(), 1);
}

#[test]
fn test_terminal_state_fails_fast() {
    let (mut session, transport) = open_ws_session();
    transport.queue_read(MockRead::Closed);
    session.get_messages().unwrap();
    let sent_before = transport.sent().len();

    assert_eq!(session.send_message(b"{}"), Err(NetworkError::NotConnected));
    assert_eq!(session.get_messages(), Err(NetworkError::NotConnected));
    assert_eq!(transport.sent().len(), sent_before);
}

#[test]
fn test_local_close_sends_normal_close_frame_once() {
    let (mut session, transport) = open_ws_session();

    session.close();
    session.close();

    let frames = client_frames(&transport);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].opcode, OpCode::Control(Control::Close));
    assert_eq!(frames[0].payload, 1000u16.to_be_bytes());
    assert_eq!(transport.close_calls(), 1);
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_drop_closes_transport() {
    let (session, transport) = open_ws_session();
    drop(session);
    assert_eq!(transport.close_calls(), 1);
}

#[test]
fn test_read_failure_fails_session() {
    let (mut session, transport) = open_ws_session();
    transport.queue_read(MockRead::Error(NetworkError::ConnectionClosed));

    assert_eq!(session.get_messages(), Err(NetworkError::ConnectionClosed));
    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(transport.close_calls(), 1);
}

#[test]
fn test_read_timeout_keeps_session_open() {
    let (mut session, transport) = open_ws_session();

    assert_eq!(session.get_messages(), Err(NetworkError::Timeout));
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(transport.close_calls(), 0);
}
