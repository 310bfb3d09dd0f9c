// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Wire Fixtures
//!
//! Server-side frames and responses fed to the codecs, and a decoder for
//! the frames the client wrote.

use std::io::Cursor;

use tungstenite::handshake::derive_accept_key;
use tungstenite::protocol::frame::coding::{Control, Data, OpCode};
use tungstenite::protocol::frame::FrameHeader;
use web3rpc_core::codec::websocket::{apply_mask, encode_frame};

/// `101 Switching Protocols` for the upgrade request in `request`.
pub fn upgrade_response(request: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(request);
    let key = text
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("Sec-WebSocket-Key"))
        .map(|(_, value)| value.trim().to_string())
        .expect("upgrade request carries a key");

    format!(
        "HTTP/1.1 101 Switching Protocols\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Accept: {}\r\n\
         \r\n",
        derive_accept_key(key.as_bytes())
    )
    .into_bytes()
}

/// Plain HTTP response with a `Content-Length` body.
pub fn http_response(status: u16, reason: &str, body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
        status,
        reason,
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

/// Unmasked server frame.
pub fn server_frame(opcode: OpCode, is_final: bool, payload: &[u8]) -> Vec<u8> {
    encode_frame(opcode, is_final, payload, None).unwrap()
}

pub fn server_text(text: &str) -> Vec<u8> {
    server_frame(OpCode::Data(Data::Text), true, text.as_bytes())
}

/// One fragment of a server text message; only the first carries the
/// text opcode.
pub fn server_text_fragment(text: &str, first: bool, last: bool) -> Vec<u8> {
    let opcode = if first {
        OpCode::Data(Data::Text)
    } else {
        OpCode::Data(Data::Continue)
    };
    server_frame(opcode, last, text.as_bytes())
}

pub fn server_binary_fragment(data: &[u8], first: bool, last: bool) -> Vec<u8> {
    let opcode = if first {
        OpCode::Data(Data::Binary)
    } else {
        OpCode::Data(Data::Continue)
    };
    server_frame(opcode, last, data)
}

pub fn server_ping(payload: &[u8]) -> Vec<u8> {
    server_frame(OpCode::Control(Control::Ping), true, payload)
}

pub fn server_close(code: u16, reason: &str) -> Vec<u8> {
    let mut payload = code.to_be_bytes().to_vec();
    payload.extend_from_slice(reason.as_bytes());
    server_frame(OpCode::Control(Control::Close), true, &payload)
}

/// A frame written by the client, payload unmasked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFrame {
    pub opcode: OpCode,
    pub is_final: bool,
    pub masked: bool,
    pub payload: Vec<u8>,
}

/// Decodes every complete client frame in `data`.
pub fn decode_client_frames(data: &[u8]) -> Vec<ClientFrame> {
    let mut frames = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let mut cursor = Cursor::new(&data[offset..]);
        let (header, length) = match FrameHeader::parse(&mut cursor) {
            Ok(Some(parsed)) => parsed,
            _ => break,
        };
        let start = offset + cursor.position() as usize;
        let end = start + length as usize;
        if end > data.len() {
            break;
        }
        let mut payload = data[start..end].to_vec();
        if let Some(mask) = header.mask {
            apply_mask(&mut payload, mask);
        }
        frames.push(ClientFrame {
            opcode: header.opcode,
            is_final: header.is_final,
            masked: header.mask.is_some(),
            payload,
        });
        offset = end;
    }
    frames
}
