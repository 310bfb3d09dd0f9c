// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared fixtures for session and client tests. Everything runs over the
//! mock transport with a recording sleeper.

#![allow(dead_code)]

pub mod frames;
pub mod strategies;

use std::sync::Arc;

use serde_json::{json, Value};
use tungstenite::protocol::frame::coding::{Data, OpCode};
use web3rpc_core::network::*;
use web3rpc_core::rpc::{RpcClient, RpcClientConfig};

use frames::{decode_client_frames, http_response, ClientFrame};

pub const WSS_URL: &str = "wss://node.example.com/ws";
pub const HTTPS_URL: &str = "https://node.example.com/rpc";

/// Mock transport that accepts the WebSocket upgrade on first read.
pub fn accepting_transport() -> MockTransport {
    let transport = MockTransport::new();
    transport.queue_read(MockRead::AcceptUpgrade);
    transport
}

/// WebSocket session over an accepting mock transport.
pub fn open_ws_session() -> (WebSocketSession<MockTransport>, MockTransport) {
    let connector = MockConnector::new();
    let transport = connector.push_transport(accepting_transport());
    let endpoint = Endpoint::parse(WSS_URL).unwrap();
    let session = WebSocketSession::connect(
        &connector,
        &endpoint,
        &TransportConfig::default(),
        "web3rpc-test",
        &MockSleeper::new(),
    )
    .unwrap();
    (session, transport)
}

/// RPC client over mock connections, with a recording sleeper.
pub fn mock_client(
    url: &str,
    retries: u32,
) -> (RpcClient<MockConnector>, MockConnector, Arc<MockSleeper>) {
    let connector = MockConnector::new();
    let sleeper = Arc::new(MockSleeper::new());
    let config = RpcClientConfig::new(url)
        .with_user_agent("web3rpc-test")
        .with_retries(retries);
    let client = RpcClient::new(connector.clone(), config)
        .unwrap()
        .with_sleeper(sleeper.clone());
    (client, connector, sleeper)
}

pub fn rpc_result(id: u64, result: Value) -> String {
    json!({"jsonrpc": "2.0", "id": id, "result": result}).to_string()
}

pub fn rpc_error(id: u64, code: i64, message: &str) -> String {
    json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}}).to_string()
}

/// Every frame the client wrote after the upgrade request.
pub fn client_frames(transport: &MockTransport) -> Vec<ClientFrame> {
    let sent = transport.sent();
    decode_client_frames(&sent[1..].concat())
}

/// JSON-RPC requests sent as WebSocket text frames.
pub fn ws_requests(transport: &MockTransport) -> Vec<Value> {
    client_frames(transport)
        .into_iter()
        .filter(|f| f.opcode == OpCode::Data(Data::Text))
        .map(|f| serde_json::from_slice(&f.payload).unwrap())
        .collect()
}

/// Splits a sent HTTP request into head and body.
pub fn http_request(transport: &MockTransport) -> (String, Vec<u8>) {
    let sent = transport.sent().concat();
    let split = sent
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("request head terminator");
    (
        String::from_utf8(sent[..split + 4].to_vec()).unwrap(),
        sent[split + 4..].to_vec(),
    )
}

/// JSON-RPC request sent over an HTTP transport.
pub fn http_rpc_request(transport: &MockTransport) -> Value {
    let (_, body) = http_request(transport);
    serde_json::from_slice(&body).unwrap()
}

/// Mock transport answering one HTTP POST with `body`.
pub fn http_transport(status: u16, reason: &str, body: &str) -> MockTransport {
    let transport = MockTransport::new();
    transport.queue_data(http_response(status, reason, body.as_bytes()));
    transport
}
