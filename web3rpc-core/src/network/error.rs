// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network Error Types
//!
//! One error type shared by the transport, the sessions and the JSON-RPC
//! correlator. The retry policy lives in [`NetworkError::is_retryable`].

use thiserror::Error;

use crate::rpc::JsonRpcError;

/// Errors raised by the network layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Endpoint URL could not be used (bad scheme, missing host, ...).
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport could not be opened (DNS, TCP or TLS failure).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// WebSocket upgrade did not complete within the handshake budget.
    #[error("WebSocket handshake timeout")]
    HandshakeTimeout,

    /// WebSocket upgrade was refused by the server.
    #[error("WebSocket handshake rejected with status {status}")]
    HandshakeRejected { status: u16 },

    /// Peer closed the byte stream mid-exchange.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Peer sent a WebSocket close frame.
    #[error("Connection closed by peer: code={code} reason={reason}")]
    RemoteClosed { code: u16, reason: String },

    /// Writing to the transport failed.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Reading from the transport failed.
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    /// Blocking read hit the transport read timeout.
    #[error("Connection timeout")]
    Timeout,

    /// Operation attempted on a session that is not open.
    #[error("Transport not connected")]
    NotConnected,

    /// Malformed HTTP or WebSocket bytes.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Response body is not a valid JSON-RPC 2.0 envelope.
    #[error("Invalid JSON-RPC response: {0}")]
    InvalidResponse(String),

    /// Response id does not match the outstanding request.
    #[error("JSON-RPC response id mismatch: expected {expected}, got {received}")]
    IdMismatch { expected: u64, received: String },

    /// Well-formed response carrying an `error` member.
    #[error("JSON-RPC error: {0}")]
    Rpc(JsonRpcError),

    /// HTTP response status other than 200.
    #[error("HTTP error status {0}")]
    HttpStatus(u16),

    /// Request aborted through an interrupt handle.
    #[error("Request interrupted")]
    Interrupted,
}

impl NetworkError {
    /// Returns true if a fresh attempt may succeed where this one failed.
    ///
    /// Application errors, interrupts and configuration errors are final.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            NetworkError::Rpc(_) | NetworkError::Interrupted | NetworkError::InvalidEndpoint(_)
        )
    }

    /// Returns true if the session that produced this error can be reused.
    pub fn keeps_session(&self) -> bool {
        matches!(self, NetworkError::Rpc(_))
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => NetworkError::Timeout,
            std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::UnexpectedEof => NetworkError::ConnectionClosed,
            _ => NetworkError::ReceiveFailed(e.to_string()),
        }
    }
}

impl From<tungstenite::Error> for NetworkError {
    fn from(e: tungstenite::Error) -> Self {
        NetworkError::Protocol(e.to_string())
    }
}
