// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Endpoint
//!
//! The single remote peer a session talks to, parsed once from a node URL.

use std::fmt;

use url::Url;

use super::error::NetworkError;

/// Default port for both `wss` and `https`.
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Accepted URL schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Persistent WebSocket over TLS.
    Wss,
    /// One-shot HTTP/1.1 over TLS.
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Wss => "wss",
            Scheme::Https => "https",
        }
    }
}

/// Parsed node endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    host: String,
    port: u16,
    path: String,
}

impl Endpoint {
    /// Parses a `wss://` or `https://` URL.
    ///
    /// Any other scheme is a configuration error. The path defaults to `/`
    /// and keeps its query string.
    pub fn parse(url: &str) -> Result<Self, NetworkError> {
        let parsed = Url::parse(url)
            .map_err(|e| NetworkError::InvalidEndpoint(format!("{}: {}", url, e)))?;

        let scheme = match parsed.scheme() {
            "wss" => Scheme::Wss,
            "https" => Scheme::Https,
            other => {
                return Err(NetworkError::InvalidEndpoint(format!(
                    "Only accept HTTPS and WebSocket connection scheme, got {}",
                    other
                )))
            }
        };

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| NetworkError::InvalidEndpoint(format!("Missing host in {}", url)))?
            .to_string();

        let port = parsed.port().unwrap_or(DEFAULT_HTTPS_PORT);

        let mut path = match parsed.path() {
            "" => "/".to_string(),
            p => p.to_string(),
        };
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Endpoint {
            scheme,
            host,
            port,
            path,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Request target (path plus query).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Value for the `Host` header; the port is only spelled out when it is
    /// not the default.
    pub fn host_header(&self) -> String {
        if self.port == DEFAULT_HTTPS_PORT {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:{}{}",
            self.scheme.as_str(),
            self.host,
            self.port,
            self.path
        )
    }
}
