// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network + Transport Layer
//!
//! Byte transports and the message sessions built on top of them.
//!
//! # Architecture
//!
//! The network layer consists of:
//! - **Transport trait**: blocking encrypted byte stream to one host
//! - **Connector trait**: opens transports, so sessions can be re-opened
//! - **WebSocket session**: handshake, reassembly, pong replies, close
//! - **HTTP session**: one POST and one response per connection
//! - **Session trait**: what the JSON-RPC client drives
//!
//! # Example
//!
//! ```ignore
//! use web3rpc_core::network::{Endpoint, MockConnector, MockSleeper, MockTransport, MockRead,
//!     Session, TransportConfig, WebSocketSession};
//!
//! let connector = MockConnector::new();
//! let transport = connector.push_transport(MockTransport::new());
//! transport.queue_read(MockRead::AcceptUpgrade);
//!
//! let endpoint = Endpoint::parse("wss://node.example.com/ws")?;
//! let mut session = WebSocketSession::connect(
//!     &connector, &endpoint, &TransportConfig::default(), "web3rpc", &MockSleeper::new())?;
//! session.send_message(br#"{"jsonrpc":"2.0","id":1,"method":"eth_gasPrice","params":[]}"#)?;
//! ```

pub mod clock;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod mock;
pub mod session;
#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
pub mod tls;
pub mod transport;
pub mod websocket;

// Error types
pub use error::NetworkError;

// Endpoint parsing
pub use endpoint::{Endpoint, Scheme, DEFAULT_HTTPS_PORT};

// Transport abstraction
pub use transport::{Connector, Transport, TransportConfig, TransportResult};

// Waiting and cancellation
pub use clock::{InterruptHandle, Sleeper, ThreadSleeper};

// Sessions
pub use http::HttpSession;
pub use session::{InboundMessage, Session, SessionState};
pub use websocket::WebSocketSession;

// Mock transport for testing
pub use mock::{MockConnector, MockRead, MockSleeper, MockTransport};

// TLS transport for production
#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
pub use tls::{TlsConnector, TlsTransport, RECEIVING_BUFFER_SIZE};
