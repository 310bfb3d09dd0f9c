// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session Trait
//!
//! Message-level send/receive on top of a byte transport. Implemented by
//! the WebSocket and the HTTP sessions.

use super::transport::TransportResult;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport opened, upgrade request sent.
    Connecting,
    /// Ready for application messages.
    Open,
    /// Close in progress.
    Closing,
    /// Closed by either side.
    Closed,
    /// Upgrade refused by the server.
    Rejected,
    /// Upgrade did not complete.
    Failed,
}

impl SessionState {
    /// Closed, rejected and failed sessions never come back.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Closed | SessionState::Rejected | SessionState::Failed
        )
    }
}

/// A completed inbound application message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Text(String),
    Binary(Vec<u8>),
}

impl InboundMessage {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            InboundMessage::Text(text) => text.as_bytes(),
            InboundMessage::Binary(data) => data,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Message-level connection to a node.
///
/// `get_messages` performs one round of reading and decoding; it may or
/// may not complete a message. Completed messages are collected in an
/// ordered queue and handed out newest first by `pop_message`.
pub trait Session: Send {
    /// Sends one complete application message.
    fn send_message(&mut self, payload: &[u8]) -> TransportResult<()>;

    /// Reads from the transport and queues any completed messages.
    fn get_messages(&mut self) -> TransportResult<()>;

    /// Takes the most recently completed message.
    fn pop_message(&mut self) -> Option<InboundMessage>;

    /// Number of completed messages not yet taken.
    fn pending(&self) -> usize;

    /// Drops every completed message not yet taken; returns how many.
    fn discard_pending(&mut self) -> usize;

    /// Returns true while the session can still receive.
    fn is_open(&self) -> bool;

    /// Returns true if another message may be sent on this session.
    fn is_usable(&self) -> bool;

    /// Releases the transport. Safe to call more than once.
    fn close(&mut self);
}
