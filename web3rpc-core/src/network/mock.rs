// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Transport
//!
//! Scripted in-memory transport, connector and sleeper for tests. Clones of
//! a [`MockTransport`] share state, so a test can keep a handle on a
//! transport after handing it to a connector.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tungstenite::handshake::derive_accept_key;

use super::clock::{InterruptHandle, Sleeper};
use super::error::NetworkError;
use super::transport::{Connector, Transport, TransportConfig, TransportResult};

/// One scripted result of [`Transport::receive`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockRead {
    /// Bytes delivered as one chunk.
    Data(Vec<u8>),
    /// A `101 Switching Protocols` answering the upgrade request sent so far.
    AcceptUpgrade,
    /// Peer end of stream (empty read).
    Closed,
    /// Read failure.
    Error(NetworkError),
}

#[derive(Debug)]
struct MockTransportState {
    reads: VecDeque<MockRead>,
    sent: Vec<Vec<u8>>,
    open: bool,
    close_calls: usize,
    send_error: Option<NetworkError>,
}

/// Scripted transport.
///
/// Reads are served from a queue; once it is empty `receive` fails with
/// [`NetworkError::Timeout`], like a socket whose peer stays silent.
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            state: Arc::new(Mutex::new(MockTransportState {
                reads: VecDeque::new(),
                sent: Vec::new(),
                open: true,
                close_calls: 0,
                send_error: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queues a scripted read.
    pub fn queue_read(&self, read: MockRead) -> &Self {
        self.lock().reads.push_back(read);
        self
    }

    /// Queues bytes delivered as one chunk.
    pub fn queue_data(&self, data: impl Into<Vec<u8>>) -> &Self {
        self.queue_read(MockRead::Data(data.into()))
    }

    /// Makes the next `send` fail.
    pub fn fail_next_send(&self, error: NetworkError) {
        self.lock().send_error = Some(error);
    }

    /// Every buffer passed to `send`, in order.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.lock().sent.clone()
    }

    /// Number of `close` calls.
    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }

    /// Scripted reads not consumed yet.
    pub fn reads_remaining(&self) -> usize {
        self.lock().reads.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> TransportResult<()> {
        let mut state = self.lock();
        if !state.open {
            return Err(NetworkError::NotConnected);
        }
        if let Some(error) = state.send_error.take() {
            return Err(error);
        }
        state.sent.push(data.to_vec());
        Ok(())
    }

    fn receive(&mut self) -> TransportResult<Vec<u8>> {
        let mut state = self.lock();
        if !state.open {
            return Err(NetworkError::NotConnected);
        }
        match state.reads.pop_front() {
            None => Err(NetworkError::Timeout),
            Some(MockRead::Data(data)) => Ok(data),
            Some(MockRead::AcceptUpgrade) => {
                let request: Vec<u8> = state.sent.concat();
                upgrade_response(&request)
            }
            Some(MockRead::Closed) => {
                state.open = false;
                Ok(Vec::new())
            }
            Some(MockRead::Error(error)) => Err(error),
        }
    }

    fn close(&mut self) {
        let mut state = self.lock();
        state.open = false;
        state.close_calls += 1;
    }

    fn is_open(&self) -> bool {
        self.lock().open
    }
}

#[derive(Debug, Default)]
struct MockConnectorState {
    outcomes: VecDeque<Result<MockTransport, NetworkError>>,
    opened: Vec<(String, u16)>,
}

/// Connector handing out queued [`MockTransport`]s in order.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockConnectorState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockConnectorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queues a transport for the next `open`. Returns a shared handle.
    pub fn push_transport(&self, transport: MockTransport) -> MockTransport {
        self.lock().outcomes.push_back(Ok(transport.clone()));
        transport
    }

    /// Makes the next `open` fail.
    pub fn push_failure(&self, error: NetworkError) {
        self.lock().outcomes.push_back(Err(error));
    }

    /// Number of `open` calls, successful or not.
    pub fn open_count(&self) -> usize {
        self.lock().opened.len()
    }

    /// Host and port of every `open` call.
    pub fn opened(&self) -> Vec<(String, u16)> {
        self.lock().opened.clone()
    }
}

impl Connector for MockConnector {
    type Transport = MockTransport;

    fn open(&self, host: &str, port: u16, _config: &TransportConfig) -> TransportResult<MockTransport> {
        let mut state = self.lock();
        state.opened.push((host.to_string(), port));
        state.outcomes.pop_front().unwrap_or_else(|| {
            Err(NetworkError::ConnectionFailed(format!(
                "no mock transport queued for {}:{}",
                host, port
            )))
        })
    }
}

/// Sleeper that records durations instead of sleeping.
#[derive(Debug, Default)]
pub struct MockSleeper {
    sleeps: Mutex<Vec<Duration>>,
    interrupt: Mutex<Option<(InterruptHandle, usize)>>,
}

impl MockSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggers `handle` during the `count`-th sleep.
    pub fn interrupt_after(&self, handle: InterruptHandle, count: usize) {
        *self
            .interrupt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some((handle, count));
    }

    /// Every requested duration, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

impl Sleeper for MockSleeper {
    fn sleep(&self, duration: Duration) {
        let count = {
            let mut sleeps = self.sleeps.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            sleeps.push(duration);
            sleeps.len()
        };
        let interrupt = self.interrupt.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some((handle, after)) = interrupt.as_ref() {
            if count >= *after {
                handle.trigger();
            }
        }
    }
}

/// `101 Switching Protocols` for the upgrade request found in `request`.
fn upgrade_response(request: &[u8]) -> TransportResult<Vec<u8>> {
    let text = String::from_utf8_lossy(request);
    let key = text
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("Sec-WebSocket-Key"))
        .map(|(_, value)| value.trim().to_string())
        .ok_or_else(|| NetworkError::Protocol("no upgrade request sent".into()))?;

    Ok(format!(
        "HTTP/1.1 101 Switching Protocols\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Accept: {}\r\n\
         \r\n",
        derive_accept_key(key.as_bytes())
    )
    .into_bytes())
}
