// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! web3rpc Core Library
//!
//! Minimal JSON-RPC client for blockchain nodes, over a persistent
//! WebSocket (`wss://`) or one-shot HTTPS (`https://`) connection.

pub mod codec;
pub mod network;
pub mod rpc;
pub mod web3;

pub use network::{
    Connector, Endpoint, InterruptHandle, MockConnector, MockTransport, NetworkError, Session,
    Transport, TransportConfig, TransportResult,
};
#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
pub use network::{TlsConnector, TlsTransport};
pub use rpc::{JsonRpcError, RpcClient, RpcClientConfig};
pub use web3::{BlockTag, PairInfo, TokenInfo, Web3Client, Web3Error, Web3Result};
