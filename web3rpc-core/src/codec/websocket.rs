// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! WebSocket Client Codec
//!
//! Turns received bytes into [`WsEvent`]s and application payloads into
//! masked client frames. Frame headers and handshake keys come from
//! tungstenite; this module owns the client state machine around them.

use std::io::Cursor;

use rand::Rng;
use tungstenite::handshake::client::generate_key;
use tungstenite::handshake::derive_accept_key;
use tungstenite::protocol::frame::coding::{Control, Data, OpCode};
use tungstenite::protocol::frame::FrameHeader;

use super::{header_value, MAX_HEADERS};
use crate::network::NetworkError;

/// Largest frame payload accepted from the server (64 MiB).
pub const MAX_FRAME_SIZE: u64 = 64 << 20;

/// Normal closure status code.
pub const CLOSE_NORMAL: u16 = 1000;

/// Status reported when a close frame carries no code.
pub const CLOSE_NO_STATUS: u16 = 1005;

/// Largest payload a control frame may carry.
const MAX_CONTROL_PAYLOAD: usize = 125;

/// Longest frame header: 2 bytes, 8 bytes of extended length, 4 bytes of mask.
const MAX_HEADER_SIZE: usize = 14;

const OPCODE_MASK: u8 = 0x0F;

/// Opcodes 3-7 and 11-15 carry no meaning without an extension.
fn is_reserved_opcode(opcode: u8) -> bool {
    matches!(opcode, 0x3..=0x7 | 0xB..=0xF)
}

/// Kind of a data message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Binary,
}

/// Decoded protocol event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsEvent {
    /// Server accepted the upgrade.
    Accept,
    /// Server answered the upgrade with a non-101 status.
    Reject { status: u16 },
    /// Keep-alive ping; must be answered with a pong carrying the payload.
    Ping(Vec<u8>),
    /// Pong (unsolicited or answering a ping we never send).
    Pong(Vec<u8>),
    /// Fragment of a text message. Bytes may split a UTF-8 sequence.
    Text { data: Vec<u8>, finished: bool },
    /// Fragment of a binary message.
    Binary { data: Vec<u8>, finished: bool },
    /// Peer closed the connection.
    Close { code: u16, reason: String },
    /// Frame with a reserved opcode.
    Unsupported { opcode: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CodecState {
    Idle,
    AwaitingUpgrade { key: String },
    Open,
    Closed,
}

/// Client side of one WebSocket connection.
///
/// # Example
///
/// ```ignore
/// let mut codec = WsCodec::client();
/// transport.send(&codec.handshake_request("node.example.com", "/ws", "web3rpc"))?;
/// codec.receive_data(&transport.receive()?);
/// for event in codec.events()? {
///     // Accept, Ping, Text, ...
/// }
/// ```
#[derive(Debug)]
pub struct WsCodec {
    state: CodecState,
    buffer: Vec<u8>,
    /// Kind of the data message whose continuation frames are pending.
    message_kind: Option<MessageKind>,
}

impl WsCodec {
    pub fn client() -> Self {
        WsCodec {
            state: CodecState::Idle,
            buffer: Vec::new(),
            message_kind: None,
        }
    }

    /// Returns true once the upgrade has been accepted and until a close
    /// frame is decoded.
    pub fn is_open(&self) -> bool {
        self.state == CodecState::Open
    }

    /// Builds the HTTP upgrade request and starts waiting for its answer.
    pub fn handshake_request(&mut self, host: &str, target: &str, user_agent: &str) -> Vec<u8> {
        let key = generate_key();
        let request = format!(
            "GET {} HTTP/1.1\r\n\
             Host: {}\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Key: {}\r\n\
             Sec-WebSocket-Version: 13\r\n\
             User-Agent: {}\r\n\
             \r\n",
            target, host, key, user_agent
        );
        self.state = CodecState::AwaitingUpgrade { key };
        self.buffer.clear();
        request.into_bytes()
    }

    /// Buffers received bytes. Nothing is decoded until [`Self::events`].
    pub fn receive_data(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Bytes received but not yet part of a complete event.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Decodes every complete event, in arrival order.
    ///
    /// Incomplete trailing data stays buffered for the next call.
    pub fn events(&mut self) -> Result<Vec<WsEvent>, NetworkError> {
        let mut events = Vec::new();
        loop {
            let next = match self.state {
                CodecState::AwaitingUpgrade { .. } => self.parse_upgrade()?,
                CodecState::Open => self.parse_frame()?,
                CodecState::Idle | CodecState::Closed => None,
            };
            match next {
                Some(event) => events.push(event),
                None => break,
            }
        }
        Ok(events)
    }

    /// Encodes one complete text or binary message.
    pub fn encode_message(&self, kind: MessageKind, payload: &[u8]) -> Result<Vec<u8>, NetworkError> {
        let opcode = match kind {
            MessageKind::Text => OpCode::Data(Data::Text),
            MessageKind::Binary => OpCode::Data(Data::Binary),
        };
        encode_frame(opcode, true, payload, Some(random_mask()))
    }

    /// Encodes the pong answering a ping with `payload`.
    pub fn encode_pong(&self, payload: &[u8]) -> Result<Vec<u8>, NetworkError> {
        encode_frame(OpCode::Control(Control::Pong), true, payload, Some(random_mask()))
    }

    /// Encodes a close frame. [`CLOSE_NO_STATUS`] produces an empty body.
    pub fn encode_close(&self, code: u16, reason: &str) -> Result<Vec<u8>, NetworkError> {
        let mut payload = Vec::new();
        if code != CLOSE_NO_STATUS {
            payload.extend_from_slice(&code.to_be_bytes());
            payload.extend_from_slice(reason.as_bytes());
            payload.truncate(MAX_CONTROL_PAYLOAD);
        }
        encode_frame(OpCode::Control(Control::Close), true, &payload, Some(random_mask()))
    }

    fn parse_upgrade(&mut self) -> Result<Option<WsEvent>, NetworkError> {
        let key = match &self.state {
            CodecState::AwaitingUpgrade { key } => key.clone(),
            _ => return Ok(None),
        };

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut response = httparse::Response::new(&mut headers);
        let consumed = match response.parse(&self.buffer) {
            Ok(httparse::Status::Complete(consumed)) => consumed,
            Ok(httparse::Status::Partial) => return Ok(None),
            Err(e) => {
                return Err(NetworkError::Protocol(format!(
                    "Invalid upgrade response: {}",
                    e
                )))
            }
        };

        let status = response.code.unwrap_or(0);
        let upgraded = header_value(response.headers, "Upgrade")
            .map(|v| v.eq_ignore_ascii_case("websocket"))
            .unwrap_or(false);
        let accept = header_value(response.headers, "Sec-WebSocket-Accept").map(str::to_string);
        self.buffer.drain(..consumed);

        if status != 101 {
            self.state = CodecState::Closed;
            self.buffer.clear();
            return Ok(Some(WsEvent::Reject { status }));
        }

        if !upgraded {
            return Err(NetworkError::Protocol(
                "Upgrade response without 'Upgrade: websocket'".into(),
            ));
        }
        if accept.as_deref() != Some(derive_accept_key(key.as_bytes()).as_str()) {
            return Err(NetworkError::Protocol("Sec-WebSocket-Accept mismatch".into()));
        }

        self.state = CodecState::Open;
        Ok(Some(WsEvent::Accept))
    }

    fn parse_frame(&mut self) -> Result<Option<WsEvent>, NetworkError> {
        // tungstenite refuses reserved opcodes, so the header is parsed from a
        // copy carrying a binary opcode and the frame is skipped afterwards.
        let reserved = self
            .buffer
            .first()
            .map(|byte| byte & OPCODE_MASK)
            .filter(|opcode| is_reserved_opcode(*opcode));
        let mut head = self.buffer[..self.buffer.len().min(MAX_HEADER_SIZE)].to_vec();
        if let (Some(_), Some(first)) = (reserved, head.first_mut()) {
            *first = (*first & !OPCODE_MASK) | u8::from(OpCode::Data(Data::Binary));
        }

        let mut cursor = Cursor::new(&head[..]);
        let (header, length) = match FrameHeader::parse(&mut cursor)? {
            Some(parsed) => parsed,
            None => return Ok(None),
        };
        let header_len = cursor.position() as usize;

        if length > MAX_FRAME_SIZE {
            return Err(NetworkError::Protocol(format!(
                "Frame of {} bytes exceeds the {} bytes limit",
                length, MAX_FRAME_SIZE
            )));
        }
        let total = header_len + length as usize;
        if self.buffer.len() < total {
            return Ok(None);
        }

        let payload = self.buffer[header_len..total].to_vec();
        self.buffer.drain(..total);

        if header.rsv1 || header.rsv2 || header.rsv3 {
            return Err(NetworkError::Protocol("Reserved bits set without extension".into()));
        }
        if header.mask.is_some() {
            return Err(NetworkError::Protocol("Masked frame from server".into()));
        }
        if let Some(opcode) = reserved {
            return Ok(Some(WsEvent::Unsupported { opcode }));
        }

        let event = match header.opcode {
            OpCode::Control(control) => {
                if !header.is_final || payload.len() > MAX_CONTROL_PAYLOAD {
                    return Err(NetworkError::Protocol("Invalid control frame".into()));
                }
                match control {
                    Control::Ping => WsEvent::Ping(payload),
                    Control::Pong => WsEvent::Pong(payload),
                    Control::Close => {
                        let (code, reason) = parse_close(&payload)?;
                        self.state = CodecState::Closed;
                        self.buffer.clear();
                        WsEvent::Close { code, reason }
                    }
                    Control::Reserved(opcode) => WsEvent::Unsupported { opcode },
                }
            }
            OpCode::Data(data) => {
                let kind = match data {
                    Data::Continue => self.message_kind.ok_or_else(|| {
                        NetworkError::Protocol("Continuation frame without a message".into())
                    })?,
                    Data::Text | Data::Binary if self.message_kind.is_some() => {
                        return Err(NetworkError::Protocol(
                            "New message before the previous one finished".into(),
                        ))
                    }
                    Data::Text => MessageKind::Text,
                    Data::Binary => MessageKind::Binary,
                    Data::Reserved(opcode) => return Ok(Some(WsEvent::Unsupported { opcode })),
                };
                self.message_kind = if header.is_final { None } else { Some(kind) };
                match kind {
                    MessageKind::Text => WsEvent::Text {
                        data: payload,
                        finished: header.is_final,
                    },
                    MessageKind::Binary => WsEvent::Binary {
                        data: payload,
                        finished: header.is_final,
                    },
                }
            }
        };

        Ok(Some(event))
    }
}

impl Default for WsCodec {
    fn default() -> Self {
        Self::client()
    }
}

/// Encodes one frame. With a mask the payload is masked in the output.
pub fn encode_frame(
    opcode: OpCode,
    is_final: bool,
    payload: &[u8],
    mask: Option<[u8; 4]>,
) -> Result<Vec<u8>, NetworkError> {
    let header = FrameHeader {
        is_final,
        rsv1: false,
        rsv2: false,
        rsv3: false,
        opcode,
        mask,
    };

    let mut output = Vec::with_capacity(payload.len() + 14);
    header.format(payload.len() as u64, &mut output)?;

    let start = output.len();
    output.extend_from_slice(payload);
    if let Some(mask) = mask {
        apply_mask(&mut output[start..], mask);
    }
    Ok(output)
}

/// XORs `buf` with the 4-byte masking key. Its own inverse.
pub fn apply_mask(buf: &mut [u8], mask: [u8; 4]) {
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte ^= mask[i & 3];
    }
}

fn random_mask() -> [u8; 4] {
    let mut mask = [0u8; 4];
    rand::thread_rng().fill(&mut mask);
    mask
}

fn parse_close(payload: &[u8]) -> Result<(u16, String), NetworkError> {
    match payload.len() {
        0 => Ok((CLOSE_NO_STATUS, String::new())),
        1 => Err(NetworkError::Protocol("Truncated close status code".into())),
        _ => {
            let code = u16::from_be_bytes([payload[0], payload[1]]);
            let reason = String::from_utf8(payload[2..].to_vec())
                .map_err(|_| NetworkError::Protocol("Close reason is not UTF-8".into()))?;
            Ok((code, reason))
        }
    }
}
