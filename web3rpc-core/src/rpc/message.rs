// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! JSON-RPC 2.0 Envelopes
//!
//! Request and response objects exchanged with the node. Both are encoded
//! as compact JSON.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::network::NetworkError;

/// Protocol version carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: u64, method: &str, params: Vec<Value>) -> Self {
        RpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.to_string(),
            params,
        }
    }

    /// Compact JSON bytes, fields in `jsonrpc, id, method, params` order.
    pub fn encode(&self) -> Result<Vec<u8>, NetworkError> {
        serde_json::to_vec(self)
            .map_err(|e| NetworkError::Protocol(format!("Cannot encode request: {}", e)))
    }
}

/// A JSON-RPC response as received, before validation.
///
/// `result` distinguishes an explicit `null` (`Some(Value::Null)`) from a
/// missing member (`None`). An `error` member set to `null` counts as absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RpcResponse {
    /// Validates the envelope against the request that was sent.
    ///
    /// Checks run in order: protocol version, error member, result member,
    /// then the id.
    pub fn into_result(self, expected_id: u64) -> Result<Value, NetworkError> {
        match self.jsonrpc.as_deref() {
            Some(JSONRPC_VERSION) => {}
            other => {
                return Err(NetworkError::InvalidResponse(format!(
                    "Server is not JSONRPC 2.0 but {}",
                    other.unwrap_or("<missing>")
                )))
            }
        }

        if let Some(error) = self.error {
            return Err(NetworkError::Rpc(JsonRpcError::from_value(error)));
        }

        let result = self
            .result
            .ok_or_else(|| NetworkError::InvalidResponse("No result in response".into()))?;

        if self.id.as_u64() != Some(expected_id) {
            return Err(NetworkError::IdMismatch {
                expected: expected_id,
                received: self.id.to_string(),
            });
        }

        Ok(result)
    }
}

/// Parses a response body.
pub fn decode_response(data: &[u8]) -> Result<RpcResponse, NetworkError> {
    serde_json::from_slice(data).map_err(|e| {
        NetworkError::InvalidResponse(format!(
            "not JSON response ({}): {}",
            e,
            String::from_utf8_lossy(data)
        ))
    })
}

/// Error object returned by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Reads a standard error object. Anything else is kept whole as `data`
    /// with its JSON text as the message.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<JsonRpcError>(value.clone()) {
            Ok(error) => error,
            Err(_) => JsonRpcError {
                code: 0,
                message: value.to_string(),
                data: Some(value),
            },
        }
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)?;
        if let Some(data) = &self.data {
            write!(f, ": {}", data)?;
        }
        Ok(())
    }
}
