// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! TLS Transport
//!
//! Real byte transport over TCP + TLS. Supports both native-tls and rustls
//! backends.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

#[cfg(all(feature = "network-native-tls", not(feature = "network-rustls")))]
use native_tls::TlsConnector as NativeTlsConnector;

#[cfg(feature = "network-rustls")]
use rustls::pki_types::ServerName;
#[cfg(feature = "network-rustls")]
use std::sync::Arc;

use tracing::{debug, trace};
use tungstenite::stream::MaybeTlsStream;

use super::error::NetworkError;
use super::transport::{Connector, Transport, TransportConfig, TransportResult};

/// Size of one blocking read.
pub const RECEIVING_BUFFER_SIZE: usize = 8192;

/// Opens [`TlsTransport`]s.
///
/// # Example
///
/// ```ignore
/// use web3rpc_core::network::{Connector, TlsConnector, TransportConfig};
///
/// let mut transport = TlsConnector.open("rpc.example.com", 443, &TransportConfig::default())?;
/// transport.send(b"...")?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TlsConnector;

impl TlsConnector {
    fn connect_tcp(host: &str, port: u16, config: &TransportConfig) -> TransportResult<TcpStream> {
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|e| NetworkError::ConnectionFailed(format!("{}:{}: {}", host, port, e)))?;

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, config.connect_timeout()) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }

        Err(NetworkError::ConnectionFailed(match last_error {
            Some(e) => format!("{}:{}: {}", host, port, e),
            None => format!("{}:{}: no address resolved", host, port),
        }))
    }

    /// Create a TLS stream using native-tls
    #[cfg(all(feature = "network-native-tls", not(feature = "network-rustls")))]
    fn create_tls_stream(
        host: &str,
        tcp_stream: TcpStream,
    ) -> Result<MaybeTlsStream<TcpStream>, NetworkError> {
        let connector = NativeTlsConnector::new()
            .map_err(|e| NetworkError::ConnectionFailed(format!("TLS error: {}", e)))?;
        let tls_stream = connector
            .connect(host, tcp_stream)
            .map_err(|e| NetworkError::ConnectionFailed(format!("TLS handshake failed: {}", e)))?;
        Ok(MaybeTlsStream::NativeTls(tls_stream))
    }

    /// Create a TLS stream using rustls
    #[cfg(feature = "network-rustls")]
    fn create_tls_stream(
        host: &str,
        tcp_stream: TcpStream,
    ) -> Result<MaybeTlsStream<TcpStream>, NetworkError> {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let server_name: ServerName<'_> = host.try_into().map_err(|_| {
            NetworkError::ConnectionFailed(format!("Invalid server name: {}", host))
        })?;

        let tls_conn = rustls::ClientConnection::new(Arc::new(config), server_name.to_owned())
            .map_err(|e| NetworkError::ConnectionFailed(format!("TLS setup failed: {}", e)))?;

        let tls_stream = rustls::StreamOwned::new(tls_conn, tcp_stream);
        Ok(MaybeTlsStream::Rustls(tls_stream))
    }
}

impl Connector for TlsConnector {
    type Transport = TlsTransport;

    fn open(
        &self,
        host: &str,
        port: u16,
        config: &TransportConfig,
    ) -> TransportResult<TlsTransport> {
        let tcp_stream = Self::connect_tcp(host, port, config)?;

        tcp_stream
            .set_read_timeout(Some(config.io_timeout()))
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;
        tcp_stream
            .set_write_timeout(Some(config.io_timeout()))
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        let stream = Self::create_tls_stream(host, tcp_stream)?;
        trace!(host, port, "Socket connected");

        Ok(TlsTransport {
            stream: Some(stream),
        })
    }
}

/// TLS byte stream. Closed on drop.
pub struct TlsTransport {
    stream: Option<MaybeTlsStream<TcpStream>>,
}

impl Transport for TlsTransport {
    fn send(&mut self, data: &[u8]) -> TransportResult<()> {
        let stream = self.stream.as_mut().ok_or(NetworkError::NotConnected)?;

        let result = stream.write_all(data).and_then(|_| stream.flush());
        result.map_err(|e| match NetworkError::from(e) {
            NetworkError::ReceiveFailed(msg) => NetworkError::SendFailed(msg),
            other => other,
        })
    }

    fn receive(&mut self) -> TransportResult<Vec<u8>> {
        let stream = self.stream.as_mut().ok_or(NetworkError::NotConnected)?;

        let mut buffer = vec![0u8; RECEIVING_BUFFER_SIZE];
        let read = stream.read(&mut buffer)?;
        if read == 0 {
            debug!("Socket disconnected");
            self.close();
            return Ok(Vec::new());
        }

        buffer.truncate(read);
        Ok(buffer)
    }

    fn close(&mut self) {
        if self.stream.take().is_some() {
            trace!("Closing socket");
        }
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for TlsTransport {
    fn drop(&mut self) {
        self.close();
    }
}
