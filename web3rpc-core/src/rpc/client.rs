// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! RPC Client
//!
//! Correlates JSON-RPC requests with their responses over one session and
//! retries failed exchanges.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, trace, warn};

use super::message::{decode_response, RpcRequest};
use crate::network::{
    Connector, Endpoint, HttpSession, InboundMessage, InterruptHandle, NetworkError, Scheme,
    Session, Sleeper, ThreadSleeper, TransportConfig, TransportResult, WebSocketSession,
};

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = "web3rpc";

/// Configuration for the RPC client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcClientConfig {
    /// Node URL, `wss://` or `https://`.
    pub url: String,
    /// Sent in the upgrade request and in every HTTP request.
    pub user_agent: String,
    /// Attempts per request. Zero is treated as one.
    pub retries: u32,
    /// Fixed wait between attempts in milliseconds.
    pub retry_delay_ms: u64,
    /// Transport configuration.
    pub transport: TransportConfig,
}

impl RpcClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        RpcClientConfig {
            url: url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retries: 3,
            retry_delay_ms: 300,
            transport: TransportConfig::default(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_retry_delay_ms(mut self, ms: u64) -> Self {
        self.retry_delay_ms = ms;
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Number of attempts made per request.
    pub fn attempts(&self) -> u32 {
        self.retries.max(1)
    }
}

/// JSON-RPC client over a WebSocket or HTTP session.
///
/// One request is in flight at a time. Ids start at 1 and grow by one per
/// attempt. The session is opened lazily and replaced after any failure
/// other than a JSON-RPC error reported by the node.
///
/// # Example
///
/// ```ignore
/// use web3rpc_core::network::TlsConnector;
/// use web3rpc_core::rpc::{RpcClient, RpcClientConfig};
///
/// let config = RpcClientConfig::new("https://rpc.example.com");
/// let mut client = RpcClient::new(TlsConnector, config)?;
/// let gas_price = client.request("eth_gasPrice", vec![])?;
/// ```
pub struct RpcClient<C>
where
    C: Connector + 'static,
    C::Transport: 'static,
{
    endpoint: Endpoint,
    config: RpcClientConfig,
    connector: Arc<C>,
    sleeper: Arc<dyn Sleeper>,
    interrupt: InterruptHandle,
    session: Option<Box<dyn Session>>,
    request_id: u64,
}

impl<C> RpcClient<C>
where
    C: Connector + 'static,
    C::Transport: 'static,
{
    /// Creates a client. Fails if the URL is not a `wss://` or `https://`
    /// endpoint; no connection is made yet.
    pub fn new(connector: C, config: RpcClientConfig) -> TransportResult<Self> {
        let endpoint = Endpoint::parse(&config.url)?;

        Ok(RpcClient {
            endpoint,
            config,
            connector: Arc::new(connector),
            sleeper: Arc::new(ThreadSleeper),
            interrupt: InterruptHandle::new(),
            session: None,
            request_id: 0,
        })
    }

    /// Replaces the sleeper used for retry backoff and handshake polling.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Shares an existing interrupt flag with this client.
    pub fn with_interrupt(mut self, interrupt: InterruptHandle) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn config(&self) -> &RpcClientConfig {
        &self.config
    }

    /// Handle that aborts the request in progress at its next checkpoint.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    /// Id of the most recent request envelope, 0 before the first one.
    pub fn last_request_id(&self) -> u64 {
        self.request_id
    }

    /// Returns true if a usable session is held.
    pub fn is_connected(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_usable())
    }

    /// Opens the session now instead of on the first request.
    pub fn connect(&mut self) -> TransportResult<()> {
        self.ensure_session()
    }

    /// Closes the session. The next request opens a new one.
    pub fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
        }
    }

    /// Sends `method` with `params` and returns the `result` member.
    ///
    /// Failed attempts are retried with a fixed delay, up to the configured
    /// number of attempts. A JSON-RPC error from the node and an interrupt
    /// are returned at once. Once all attempts are spent the last error is
    /// returned.
    pub fn request(&mut self, method: &str, params: Vec<Value>) -> TransportResult<Value> {
        let attempts = self.config.attempts();
        let mut last_error = NetworkError::NotConnected;

        for attempt in 1..=attempts {
            if self.interrupt.is_triggered() {
                self.close();
                return Err(NetworkError::Interrupted);
            }

            let error = match self.attempt(method, &params) {
                Ok(result) => return Ok(result),
                Err(e) => e,
            };

            if !error.keeps_session() {
                self.close();
            }
            if !error.is_retryable() {
                debug!("RPC request {} failed: {}", method, error);
                return Err(error);
            }

            if attempt < attempts {
                warn!(
                    "RPC request {} failed (attempt {}/{}): {}",
                    method, attempt, attempts, error
                );
                self.sleeper.sleep(self.config.retry_delay());
                if self.interrupt.is_triggered() {
                    return Err(NetworkError::Interrupted);
                }
            } else {
                error!(
                    "RPC request {} failed after {} attempts: {}",
                    method, attempts, error
                );
            }
            last_error = error;
        }

        Err(last_error)
    }

    fn attempt(&mut self, method: &str, params: &[Value]) -> TransportResult<Value> {
        self.ensure_session()?;

        self.request_id += 1;
        let id = self.request_id;
        let payload = RpcRequest::new(id, method, params.to_vec()).encode()?;
        trace!(
            "Sending RPC request method:{} with data:{}",
            method,
            serde_json::Value::Array(params.to_vec())
        );

        let session = self.session.as_mut().ok_or(NetworkError::NotConnected)?;
        session.send_message(&payload)?;
        let message = wait_for_message(session.as_mut())?;

        let result = decode_response(message.as_bytes())?.into_result(id)?;
        trace!("Received RPC result: {}", result);
        Ok(result)
    }

    fn ensure_session(&mut self) -> TransportResult<()> {
        if self.session.as_ref().is_some_and(|s| s.is_usable()) {
            return Ok(());
        }
        self.close();
        self.session = Some(self.open_session()?);
        Ok(())
    }

    fn open_session(&self) -> TransportResult<Box<dyn Session>> {
        match self.endpoint.scheme() {
            Scheme::Wss => {
                let session = WebSocketSession::connect(
                    self.connector.as_ref(),
                    &self.endpoint,
                    &self.config.transport,
                    &self.config.user_agent,
                    self.sleeper.as_ref(),
                )?;
                Ok(Box::new(session))
            }
            Scheme::Https => {
                let session = HttpSession::new(
                    Arc::clone(&self.connector),
                    self.endpoint.clone(),
                    self.config.transport.clone(),
                    &self.config.user_agent,
                )?;
                Ok(Box::new(session))
            }
        }
    }
}

#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
impl RpcClient<crate::network::TlsConnector> {
    /// Creates a client over TLS sockets.
    pub fn tls(config: RpcClientConfig) -> TransportResult<Self> {
        Self::new(crate::network::TlsConnector, config)
    }
}

impl<C> Drop for RpcClient<C>
where
    C: Connector + 'static,
    C::Transport: 'static,
{
    fn drop(&mut self) {
        self.close();
    }
}

/// Drains the session until a completed message is queued and takes the
/// newest one. Older queued messages are dropped.
fn wait_for_message(session: &mut dyn Session) -> TransportResult<InboundMessage> {
    loop {
        if let Some(message) = session.pop_message() {
            let stale = session.discard_pending();
            if stale > 0 {
                debug!("Discarded {} older queued message(s)", stale);
            }
            return Ok(message);
        }
        if !session.is_open() {
            return Err(NetworkError::ConnectionClosed);
        }
        session.get_messages()?;
    }
}
