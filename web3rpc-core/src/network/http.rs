// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP Session
//!
//! One-shot request/response exchanges: every message opens a fresh
//! transport, posts the payload and reads one response. Connections are
//! never reused.

use std::sync::Arc;

use tracing::{debug, error, trace};

use super::endpoint::{Endpoint, Scheme};
use super::error::NetworkError;
use super::session::{InboundMessage, Session};
use super::transport::{Connector, Transport, TransportConfig, TransportResult};
use crate::codec::{encode_post, HttpEvent, ResponseDecoder};

/// HTTPS session posting JSON payloads.
pub struct HttpSession<C: Connector> {
    connector: Arc<C>,
    endpoint: Endpoint,
    config: TransportConfig,
    user_agent: String,
    transport: Option<C::Transport>,
    decoder: ResponseDecoder,
    body: Vec<u8>,
    received: Vec<InboundMessage>,
    closed: bool,
}

impl<C: Connector> HttpSession<C> {
    pub fn new(
        connector: Arc<C>,
        endpoint: Endpoint,
        config: TransportConfig,
        user_agent: &str,
    ) -> TransportResult<Self> {
        if endpoint.scheme() != Scheme::Https {
            return Err(NetworkError::InvalidEndpoint(format!(
                "HTTP session needs an https:// endpoint, got {}",
                endpoint
            )));
        }

        Ok(HttpSession {
            connector,
            endpoint,
            config,
            user_agent: user_agent.to_string(),
            transport: None,
            decoder: ResponseDecoder::new(),
            body: Vec::new(),
            received: Vec::new(),
            closed: false,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Opens a transport and posts `message`.
    pub fn post(&mut self, message: &[u8]) -> TransportResult<()> {
        if self.closed {
            return Err(NetworkError::NotConnected);
        }
        self.release();

        trace!(
            "Connecting to HTTPS Host: {}  Port: {}",
            self.endpoint.host(),
            self.endpoint.port()
        );
        let mut transport = self
            .connector
            .open(self.endpoint.host(), self.endpoint.port(), &self.config)
            .inspect_err(|e| error!("Error during TLS connection: {}", e))?;
        trace!(
            "Connected to HTTPS Host={} PathTarget={}",
            self.endpoint.host(),
            self.endpoint.path()
        );

        let request = encode_post(
            &self.endpoint.host_header(),
            self.endpoint.path(),
            &self.user_agent,
            message,
        );
        trace!("Sending HTTP POST data : {}", String::from_utf8_lossy(&request));

        if let Err(e) = transport.send(&request) {
            transport.close();
            return Err(e);
        }

        self.transport = Some(transport);
        self.decoder = ResponseDecoder::new();
        self.body.clear();
        Ok(())
    }

    /// Reads until the response is complete and queues its body.
    ///
    /// A status other than 200 fails with [`NetworkError::HttpStatus`]. The
    /// transport is closed whatever the outcome.
    pub fn read_response(&mut self) -> TransportResult<()> {
        if self.transport.is_none() {
            debug!("Socket was closed by remote party");
            return Err(NetworkError::NotConnected);
        }

        let result = self.decode_response();
        self.release();
        result
    }

    fn decode_response(&mut self) -> TransportResult<()> {
        loop {
            match self.decoder.next_event()? {
                HttpEvent::NeedData => {
                    let transport = self.transport.as_mut().ok_or(NetworkError::NotConnected)?;
                    let chunk = transport.receive()?;
                    if chunk.is_empty() {
                        debug!("Socket closed by server before end of response");
                    }
                    self.decoder.receive_data(&chunk);
                }
                HttpEvent::Response { status, reason } => {
                    if status != 200 {
                        error!("Error in response code {} {}", status, reason);
                        return Err(NetworkError::HttpStatus(status));
                    }
                }
                HttpEvent::Data(data) => {
                    trace!("Data received from HTTP query : {}", String::from_utf8_lossy(&data));
                    self.body.extend_from_slice(&data);
                }
                HttpEvent::EndOfMessage => {
                    let body = std::mem::take(&mut self.body);
                    self.received.push(InboundMessage::Binary(body));
                    return Ok(());
                }
            }
        }
    }

    fn release(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            trace!("Closing TLS");
            transport.close();
        }
    }
}

impl<C: Connector> Session for HttpSession<C> {
    fn send_message(&mut self, payload: &[u8]) -> TransportResult<()> {
        self.post(payload)
    }

    fn get_messages(&mut self) -> TransportResult<()> {
        self.read_response()
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
        self.transport.is_some()
    }

    fn is_usable(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) {
        self.closed = true;
        self.release();
    }
}

impl<C: Connector> Drop for HttpSession<C> {
    fn drop(&mut self) {
        self.release();
    }
}
