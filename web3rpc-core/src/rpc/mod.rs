// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! JSON-RPC Layer
//!
//! Envelopes and the request/response correlator that drives a network
//! session.

pub mod client;
pub mod message;

pub use client::{RpcClient, RpcClientConfig, DEFAULT_USER_AGENT};
pub use message::{decode_response, JsonRpcError, RpcRequest, RpcResponse, JSONRPC_VERSION};
