// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP/1.1 Client Codec
//!
//! Encodes the JSON POST request and decodes the response incrementally.

use super::{header_value, MAX_HEADERS};
use crate::network::NetworkError;

/// Encodes a `POST` carrying a JSON body.
pub fn encode_post(host: &str, target: &str, user_agent: &str, body: &[u8]) -> Vec<u8> {
    let mut request = format!(
        "POST {} HTTP/1.1\r\n\
         Host: {}\r\n\
         User-Agent: {}\r\n\
         Connection: close\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         \r\n",
        target,
        host,
        user_agent,
        body.len()
    )
    .into_bytes();
    request.extend_from_slice(body);
    request
}

/// Decoded response event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpEvent {
    /// More bytes are required before anything else can be decoded.
    NeedData,
    /// Final (non-informational) response head.
    Response { status: u16, reason: String },
    /// A piece of the response body.
    Data(Vec<u8>),
    /// The response is complete.
    EndOfMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Head,
    Fixed { remaining: u64 },
    ChunkSize,
    ChunkData { remaining: u64 },
    ChunkEnd,
    Trailers,
    UntilClose,
    Done,
}

/// Incremental decoder for one HTTP/1.1 response.
#[derive(Debug)]
pub struct ResponseDecoder {
    buffer: Vec<u8>,
    state: DecodeState,
    eof: bool,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        ResponseDecoder {
            buffer: Vec::new(),
            state: DecodeState::Head,
            eof: false,
        }
    }

    /// Buffers received bytes. An empty slice marks the end of the stream.
    pub fn receive_data(&mut self, data: &[u8]) {
        if data.is_empty() {
            self.eof = true;
        } else {
            self.buffer.extend_from_slice(data);
        }
    }

    /// Returns true once [`HttpEvent::EndOfMessage`] has been produced.
    pub fn is_done(&self) -> bool {
        self.state == DecodeState::Done
    }

    /// Decodes the next event.
    ///
    /// After the end of the stream is signalled this never returns
    /// [`HttpEvent::NeedData`]: the response either completes or is
    /// reported as truncated.
    pub fn next_event(&mut self) -> Result<HttpEvent, NetworkError> {
        loop {
            match self.state {
                DecodeState::Head => {
                    if let Some(event) = self.parse_head()? {
                        return Ok(event);
                    }
                }
                DecodeState::Fixed { remaining } => {
                    if remaining == 0 {
                        self.state = DecodeState::Done;
                        return Ok(HttpEvent::EndOfMessage);
                    }
                    if self.buffer.is_empty() {
                        return self.need_data("response body");
                    }
                    let data = self.take(remaining);
                    self.state = DecodeState::Fixed {
                        remaining: remaining - data.len() as u64,
                    };
                    return Ok(HttpEvent::Data(data));
                }
                DecodeState::ChunkSize => {
                    let (consumed, size) = match httparse::parse_chunk_size(&self.buffer) {
                        Ok(httparse::Status::Complete(parsed)) => parsed,
                        Ok(httparse::Status::Partial) => return self.need_data("chunk size"),
                        Err(_) => return Err(NetworkError::Protocol("Invalid chunk size".into())),
                    };
                    self.buffer.drain(..consumed);
                    self.state = if size == 0 {
                        DecodeState::Trailers
                    } else {
                        DecodeState::ChunkData { remaining: size }
                    };
                }
                DecodeState::ChunkData { remaining } => {
                    if remaining == 0 {
                        self.state = DecodeState::ChunkEnd;
                        continue;
                    }
                    if self.buffer.is_empty() {
                        return self.need_data("chunk data");
                    }
                    let data = self.take(remaining);
                    self.state = DecodeState::ChunkData {
                        remaining: remaining - data.len() as u64,
                    };
                    return Ok(HttpEvent::Data(data));
                }
                DecodeState::ChunkEnd => {
                    if self.buffer.len() < 2 {
                        return self.need_data("chunk terminator");
                    }
                    if &self.buffer[..2] != b"\r\n" {
                        return Err(NetworkError::Protocol("Missing CRLF after chunk".into()));
                    }
                    self.buffer.drain(..2);
                    self.state = DecodeState::ChunkSize;
                }
                DecodeState::Trailers => {
                    let mut trailers = [httparse::EMPTY_HEADER; MAX_HEADERS];
                    let consumed = match httparse::parse_headers(&self.buffer, &mut trailers) {
                        Ok(httparse::Status::Complete((consumed, _))) => consumed,
                        Ok(httparse::Status::Partial) => return self.need_data("trailers"),
                        Err(e) => {
                            return Err(NetworkError::Protocol(format!("Invalid trailers: {}", e)))
                        }
                    };
                    self.buffer.drain(..consumed);
                    self.state = DecodeState::Done;
                    return Ok(HttpEvent::EndOfMessage);
                }
                DecodeState::UntilClose => {
                    if !self.buffer.is_empty() {
                        return Ok(HttpEvent::Data(std::mem::take(&mut self.buffer)));
                    }
                    if self.eof {
                        self.state = DecodeState::Done;
                        return Ok(HttpEvent::EndOfMessage);
                    }
                    return Ok(HttpEvent::NeedData);
                }
                DecodeState::Done => return Ok(HttpEvent::EndOfMessage),
            }
        }
    }

    /// Parses a response head. `None` means an informational head was
    /// skipped and decoding should continue.
    fn parse_head(&mut self) -> Result<Option<HttpEvent>, NetworkError> {
        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut response = httparse::Response::new(&mut headers);
        let consumed = match response.parse(&self.buffer) {
            Ok(httparse::Status::Complete(consumed)) => consumed,
            Ok(httparse::Status::Partial) => return self.need_data("response head").map(Some),
            Err(e) => return Err(NetworkError::Protocol(format!("Invalid HTTP response: {}", e))),
        };

        let status = response.code.unwrap_or(0);
        let reason = response.reason.unwrap_or("").to_string();
        let framing = body_framing(status, response.headers)?;
        self.buffer.drain(..consumed);

        if (100..200).contains(&status) {
            return Ok(None);
        }

        self.state = framing;
        Ok(Some(HttpEvent::Response { status, reason }))
    }

    fn take(&mut self, limit: u64) -> Vec<u8> {
        let count = self.buffer.len().min(usize::try_from(limit).unwrap_or(usize::MAX));
        self.buffer.drain(..count).collect()
    }

    fn need_data(&self, context: &str) -> Result<HttpEvent, NetworkError> {
        if self.eof {
            Err(NetworkError::Protocol(format!(
                "Connection closed while reading {}",
                context
            )))
        } else {
            Ok(HttpEvent::NeedData)
        }
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn body_framing(status: u16, headers: &[httparse::Header<'_>]) -> Result<DecodeState, NetworkError> {
    if (100..200).contains(&status) || status == 204 || status == 304 {
        return Ok(DecodeState::Fixed { remaining: 0 });
    }

    let chunked = header_value(headers, "Transfer-Encoding")
        .map(|v| v.to_ascii_lowercase().contains("chunked"))
        .unwrap_or(false);
    if chunked {
        return Ok(DecodeState::ChunkSize);
    }

    match header_value(headers, "Content-Length") {
        Some(value) => value
            .parse::<u64>()
            .map(|remaining| DecodeState::Fixed { remaining })
            .map_err(|_| NetworkError::Protocol(format!("Invalid Content-Length: {}", value))),
        None => Ok(DecodeState::UntilClose),
    }
}

// INLINE_TEST_REQUIRED: Tests private body framing
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_framing_no_content_statuses() {
        assert_eq!(
            body_framing(204, &[]).unwrap(),
            DecodeState::Fixed { remaining: 0 }
        );
        assert_eq!(
            body_framing(304, &[]).unwrap(),
            DecodeState::Fixed { remaining: 0 }
        );
    }

    #[test]
    fn test_body_framing_defaults_to_until_close() {
        assert_eq!(body_framing(200, &[]).unwrap(), DecodeState::UntilClose);
    }
}
