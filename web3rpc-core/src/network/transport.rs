// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport Trait
//!
//! Byte-level duplex channel to one remote host, plus the connector that
//! opens it.

use std::time::Duration;

use super::error::NetworkError;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, NetworkError>;

/// Configuration for transport connections and the WebSocket handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Blocking read/write timeout in milliseconds.
    pub io_timeout_ms: u64,
    /// Total budget for the WebSocket upgrade in milliseconds.
    pub handshake_timeout_ms: u64,
    /// Wait between handshake polls in milliseconds.
    pub handshake_poll_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            connect_timeout_ms: 10_000,
            io_timeout_ms: 8_000,
            handshake_timeout_ms: 8_000,
            handshake_poll_ms: 400,
        }
    }
}

impl TransportConfig {
    pub fn with_io_timeout_ms(mut self, ms: u64) -> Self {
        self.io_timeout_ms = ms;
        self
    }

    pub fn with_handshake_timeout_ms(mut self, ms: u64) -> Self {
        self.handshake_timeout_ms = ms;
        self
    }

    pub fn with_handshake_poll_ms(mut self, ms: u64) -> Self {
        self.handshake_poll_ms = ms;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn handshake_poll_interval(&self) -> Duration {
        Duration::from_millis(self.handshake_poll_ms)
    }

    /// Number of poll slices that fit in the handshake budget (at least one).
    pub fn handshake_cycles(&self) -> u64 {
        if self.handshake_poll_ms == 0 {
            return 1;
        }
        (self.handshake_timeout_ms / self.handshake_poll_ms).max(1)
    }
}

/// Encrypted byte stream to one remote peer.
///
/// # Synchronous Interface
///
/// All methods block on the caller's thread. `receive` waits at most the
/// configured read timeout and reports the timeout as
/// [`NetworkError::Timeout`], never as empty data.
pub trait Transport: Send {
    /// Writes all bytes to the peer.
    fn send(&mut self, data: &[u8]) -> TransportResult<()>;

    /// Reads the next chunk of bytes.
    ///
    /// An empty vector means the peer closed the stream; the transport is
    /// closed afterwards.
    fn receive(&mut self) -> TransportResult<Vec<u8>>;

    /// Closes the stream. Safe to call more than once.
    fn close(&mut self);

    /// Returns true until the stream is closed by either side.
    fn is_open(&self) -> bool;
}

/// Opens transports to `host:port`.
pub trait Connector: Send + Sync {
    type Transport: Transport;

    fn open(
        &self,
        host: &str,
        port: u16,
        config: &TransportConfig,
    ) -> TransportResult<Self::Transport>;
}
