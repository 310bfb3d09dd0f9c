// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Protocol Codecs
//!
//! Sans-IO encoders and decoders for the two wire protocols. They never
//! touch a socket: sessions feed them received bytes and pull decoded
//! events out, and ask them for the bytes to send.

pub mod http;
pub mod websocket;

pub use http::{encode_post, HttpEvent, ResponseDecoder};
pub use websocket::{MessageKind, WsCodec, WsEvent, CLOSE_NORMAL, CLOSE_NO_STATUS, MAX_FRAME_SIZE};

/// Maximum number of headers parsed in a response head.
pub(crate) const MAX_HEADERS: usize = 64;

/// Case-insensitive header lookup.
pub(crate) fn header_value<'b>(headers: &[httparse::Header<'b>], name: &str) -> Option<&'b str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .and_then(|h| std::str::from_utf8(h.value).ok())
        .map(str::trim)
}
