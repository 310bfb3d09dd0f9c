// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! WebSocket Session
//!
//! Persistent session over one transport: opening handshake, fragment
//! reassembly, automatic pong replies and close handling.

use tracing::{debug, error, trace, warn};

use super::clock::Sleeper;
use super::endpoint::{Endpoint, Scheme};
use super::error::NetworkError;
use super::session::{InboundMessage, Session, SessionState};
use super::transport::{Connector, Transport, TransportConfig, TransportResult};
use crate::codec::{MessageKind, WsCodec, WsEvent, CLOSE_NORMAL};

/// WebSocket session owning its transport.
///
/// The transport is closed exactly once: on [`WebSocketSession::close`],
/// on a fatal error, when the peer closes, or when the session is dropped.
///
/// # Example
///
/// ```ignore
/// use web3rpc_core::network::{Endpoint, TlsConnector, ThreadSleeper, TransportConfig, WebSocketSession};
///
/// let endpoint = Endpoint::parse("wss://node.example.com/ws")?;
/// let mut session = WebSocketSession::connect(
///     &TlsConnector,
///     &endpoint,
///     &TransportConfig::default(),
///     "web3rpc",
///     &ThreadSleeper,
/// )?;
/// session.send_text(r#"{"jsonrpc":"2.0","id":1,"method":"eth_gasPrice","params":[]}"#)?;
/// ```
pub struct WebSocketSession<T: Transport> {
    transport: Option<T>,
    codec: WsCodec,
    state: SessionState,
    partial_text: Vec<Vec<u8>>,
    partial_binary: Vec<Vec<u8>>,
    received: Vec<InboundMessage>,
}

impl<T: Transport> WebSocketSession<T> {
    /// Opens a transport to the endpoint and performs the opening handshake.
    pub fn connect<C>(
        connector: &C,
        endpoint: &Endpoint,
        config: &TransportConfig,
        user_agent: &str,
        sleeper: &dyn Sleeper,
    ) -> TransportResult<Self>
    where
        C: Connector<Transport = T>,
    {
        if endpoint.scheme() != Scheme::Wss {
            return Err(NetworkError::InvalidEndpoint(format!(
                "WebSocket session needs a wss:// endpoint, got {}",
                endpoint
            )));
        }

        debug!(
            "Connecting to WebSocket Host={} PathTarget={}",
            endpoint.host(),
            endpoint.path()
        );
        let transport = connector
            .open(endpoint.host(), endpoint.port(), config)
            .inspect_err(|e| error!("Error during WebSocket connection: {}", e))?;

        Self::handshake(
            transport,
            &endpoint.host_header(),
            endpoint.path(),
            config,
            user_agent,
            sleeper,
        )
    }

    /// Runs the opening handshake over an already opened transport.
    ///
    /// Polls the transport once per poll slice until the upgrade is accepted
    /// or rejected, or the handshake budget is spent.
    pub fn handshake(
        transport: T,
        host: &str,
        target: &str,
        config: &TransportConfig,
        user_agent: &str,
        sleeper: &dyn Sleeper,
    ) -> TransportResult<Self> {
        let mut session = WebSocketSession {
            transport: Some(transport),
            codec: WsCodec::client(),
            state: SessionState::Connecting,
            partial_text: Vec::new(),
            partial_binary: Vec::new(),
            received: Vec::new(),
        };

        let request = session.codec.handshake_request(host, target, user_agent);
        trace!("Sending WebSocket upgrade: {}", String::from_utf8_lossy(&request));

        let result = match session.write(&request) {
            Ok(()) => session.await_upgrade(config, sleeper),
            Err(e) => Err(session.fail(SessionState::Failed, e)),
        };

        match result {
            Ok(()) => Ok(session),
            Err(e) => {
                error!("Error during WebSocket connection: {}", e);
                Err(e)
            }
        }
    }

    fn await_upgrade(&mut self, config: &TransportConfig, sleeper: &dyn Sleeper) -> TransportResult<()> {
        let cycles = config.handshake_cycles();
        for cycle in 0..cycles {
            debug!("Waiting WebSocket handshake : {}th loop.", cycle + 1);
            sleeper.sleep(config.handshake_poll_interval());

            match self.pump() {
                Ok(()) => {}
                Err(NetworkError::Timeout) => {
                    return Err(self.fail(SessionState::Failed, NetworkError::HandshakeTimeout))
                }
                Err(e) => return Err(self.fail(SessionState::Failed, e)),
            }

            match self.state {
                SessionState::Open => {
                    debug!("WebSocket connection established.");
                    return Ok(());
                }
                SessionState::Closed => return Err(NetworkError::ConnectionClosed),
                _ => {}
            }
        }

        Err(self.fail(SessionState::Failed, NetworkError::HandshakeTimeout))
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Sends one complete text message.
    pub fn send_text(&mut self, text: &str) -> TransportResult<()> {
        self.send(MessageKind::Text, text.as_bytes())
    }

    /// Sends one complete binary message.
    pub fn send_binary(&mut self, data: &[u8]) -> TransportResult<()> {
        self.send(MessageKind::Binary, data)
    }

    fn send(&mut self, kind: MessageKind, payload: &[u8]) -> TransportResult<()> {
        self.ensure_open()?;
        trace!("Sending message : {}", String::from_utf8_lossy(payload));
        let frame = self.codec.encode_message(kind, payload)?;
        self.write(&frame)
            .map_err(|e| self.fail(SessionState::Failed, e))
    }

    /// Reads one transport chunk and processes every event it completes.
    ///
    /// Pings are answered, fragments are buffered, and completed messages
    /// are queued. A peer close frame is reported as
    /// [`NetworkError::RemoteClosed`]; a bare end of stream closes the
    /// session without an error.
    pub fn receive(&mut self) -> TransportResult<()> {
        self.ensure_open()?;
        self.pump()
    }

    /// Closes the session, sending a normal close frame first if possible.
    pub fn close(&mut self) {
        if self.state == SessionState::Open {
            self.state = SessionState::Closing;
            if let Ok(frame) = self.codec.encode_close(CLOSE_NORMAL, "") {
                let _ = self.write(&frame);
            }
        }
        if !self.state.is_terminal() {
            self.state = SessionState::Closed;
        }
        self.release();
    }

    fn ensure_open(&self) -> TransportResult<()> {
        if self.state == SessionState::Open && self.transport.is_some() {
            Ok(())
        } else {
            Err(NetworkError::NotConnected)
        }
    }

    fn pump(&mut self) -> TransportResult<()> {
        let transport = self.transport.as_mut().ok_or(NetworkError::NotConnected)?;

        let data = match transport.receive() {
            Ok(data) => data,
            Err(NetworkError::Timeout) => return Err(NetworkError::Timeout),
            Err(e) => return Err(self.fail(SessionState::Failed, e)),
        };

        if data.is_empty() {
            debug!("Socket was closed by remote party");
            self.state = SessionState::Closed;
            self.release();
            return Ok(());
        }

        self.codec.receive_data(&data);
        let events = self
            .codec
            .events()
            .map_err(|e| self.fail(SessionState::Failed, e))?;

        for event in events {
            self.dispatch(event)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, event: WsEvent) -> TransportResult<()> {
        match event {
            WsEvent::Accept => {
                self.state = SessionState::Open;
            }
            WsEvent::Reject { status } => {
                debug!("WebSocket connection rejected.");
                self.state = SessionState::Rejected;
                self.release();
                return Err(NetworkError::HandshakeRejected { status });
            }
            WsEvent::Ping(payload) => {
                debug!("Ping received in WebSocket");
                let pong = self.codec.encode_pong(&payload)?;
                self.write(&pong)
                    .map_err(|e| self.fail(SessionState::Failed, e))?;
                debug!("Pong reply sent");
            }
            WsEvent::Pong(_) => {
                trace!("Pong received in WebSocket");
            }
            WsEvent::Text { data, finished } => {
                self.partial_text.push(data);
                if finished {
                    let bytes = self.partial_text.concat();
                    self.partial_text.clear();
                    let text = String::from_utf8(bytes).map_err(|_| {
                        self.fail(
                            SessionState::Failed,
                            NetworkError::Protocol("Text message is not valid UTF-8".into()),
                        )
                    })?;
                    trace!("WebSocket Text message received : {}", text);
                    self.received.push(InboundMessage::Text(text));
                }
            }
            WsEvent::Binary { data, finished } => {
                self.partial_binary.push(data);
                if finished {
                    let bytes = self.partial_binary.concat();
                    self.partial_binary.clear();
                    trace!("WebSocket Binary message received : {} bytes", bytes.len());
                    self.received.push(InboundMessage::Binary(bytes));
                }
            }
            WsEvent::Close { code, reason } => {
                if code == CLOSE_NORMAL {
                    debug!("WebSocket Connection closed: code={} reason={}", code, reason);
                } else {
                    error!("WebSocket Connection closed: code={} reason={}", code, reason);
                }
                self.state = SessionState::Closing;
                if let Ok(frame) = self.codec.encode_close(code, "") {
                    let _ = self.write(&frame);
                }
                self.state = SessionState::Closed;
                self.release();
                return Err(NetworkError::RemoteClosed { code, reason });
            }
            WsEvent::Unsupported { opcode } => {
                warn!("Unknown WebSocket event : opcode {}", opcode);
            }
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> TransportResult<()> {
        let transport = self.transport.as_mut().ok_or(NetworkError::NotConnected)?;
        transport.send(data)
    }

    /// Moves to a terminal state, releases the transport and hands back the
    /// error for propagation.
    fn fail(&mut self, state: SessionState, error: NetworkError) -> NetworkError {
        if !self.state.is_terminal() {
            self.state = state;
        }
        self.release();
        error
    }

    fn release(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            debug!("Closing WebSocket");
            transport.close();
        }
    }
}

impl<T: Transport> Session for WebSocketSession<T> {
    /// Valid UTF-8 payloads go out as text messages, anything else as binary.
    fn send_message(&mut self, payload: &[u8]) -> TransportResult<()> {
        match std::str::from_utf8(payload) {
            Ok(text) => self.send_text(text),
            Err(_) => self.send_binary(payload),
        }
    }

    fn get_messages(&mut self) -> TransportResult<()> {
        self.receive()
    }

    fn pop_message(&mut self) -> Option<InboundMessage> {
        self.received.pop()
    }

    fn pending(&self) -> usize {
        self.received.len()
    }

    fn discard_pending(&mut self) -> usize {
        let count = self.received.len();
        self.received.clear();
        count
    }

    fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    fn is_usable(&self) -> bool {
        self.state == SessionState::Open
    }

    fn close(&mut self) {
        WebSocketSession::close(self);
    }
}

impl<T: Transport> Drop for WebSocketSession<T> {
    fn drop(&mut self) {
        self.release();
    }
}
