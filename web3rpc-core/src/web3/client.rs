// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Web3 Client
//!
//! Named `eth_*` calls on top of [`RpcClient`].

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use super::abi::{parse_quantity, strip_hex_prefix, with_hex_prefix};
use super::error::{Web3Error, Web3Result};
use crate::network::Connector;
use crate::rpc::RpcClient;

/// Block a state query is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Earliest,
    Pending,
    Number(u64),
}

impl BlockTag {
    /// Value sent as the block parameter.
    pub fn as_param(&self) -> String {
        match self {
            BlockTag::Latest => "latest".to_string(),
            BlockTag::Earliest => "earliest".to_string(),
            BlockTag::Pending => "pending".to_string(),
            BlockTag::Number(n) => format!("0x{:x}", n),
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_param())
    }
}

impl FromStr for BlockTag {
    type Err = Web3Error;

    /// Accepts `latest`, `earliest`, `pending`, a hex block number with
    /// `0x` prefix, or a decimal block number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(BlockTag::Latest),
            "earliest" => Ok(BlockTag::Earliest),
            "pending" => Ok(BlockTag::Pending),
            other if other.starts_with("0x") => u64::from_str_radix(&other[2..], 16)
                .map(BlockTag::Number)
                .map_err(|e| Web3Error::InvalidQuantity(format!("{}: {}", s, e))),
            other => other
                .parse::<u64>()
                .map(BlockTag::Number)
                .map_err(|_| Web3Error::InvalidQuantity(format!("unknown block tag {}", s))),
        }
    }
}

/// Wallet-facing client for an Ethereum-compatible node.
///
/// # Example
///
/// ```ignore
/// use web3rpc_core::rpc::{RpcClient, RpcClientConfig};
/// use web3rpc_core::web3::{BlockTag, Web3Client};
///
/// let rpc = RpcClient::tls(RpcClientConfig::new("https://rpc.example.com"))?;
/// let mut client = Web3Client::new(rpc);
/// let wei = client.get_balance("0x7ceb23fd6bc0add59e62ac25578270cff1b9f619", BlockTag::Latest)?;
/// ```
pub struct Web3Client<C>
where
    C: Connector + 'static,
    C::Transport: 'static,
{
    rpc: RpcClient<C>,
}

impl<C> Web3Client<C>
where
    C: Connector + 'static,
    C::Transport: 'static,
{
    pub fn new(rpc: RpcClient<C>) -> Self {
        Web3Client { rpc }
    }

    /// The underlying JSON-RPC client, for methods without a wrapper.
    pub fn rpc(&mut self) -> &mut RpcClient<C> {
        &mut self.rpc
    }

    pub fn into_inner(self) -> RpcClient<C> {
        self.rpc
    }

    /// Native token balance in wei.
    pub fn get_balance(&mut self, address: &str, block: BlockTag) -> Web3Result<u128> {
        let raw = self.request_string(
            "eth_getBalance",
            vec![json!(with_hex_prefix(address)), json!(block.as_param())],
        )?;
        parse_quantity(&raw)
    }

    /// Runs a contract call and returns the raw hex result.
    ///
    /// `selector` is the 4-byte method id and `data` the encoded arguments,
    /// both as hex without prefix.
    pub fn call(
        &mut self,
        contract: &str,
        selector: &str,
        data: &str,
        block: BlockTag,
    ) -> Web3Result<String> {
        let call = json!({
            "to": with_hex_prefix(contract),
            "data": format!("0x{}{}", strip_hex_prefix(selector), strip_hex_prefix(data)),
        });
        self.request_string("eth_call", vec![call, json!(block.as_param())])
    }

    /// Broadcasts a signed raw transaction; returns its hash.
    pub fn push_tx(&mut self, tx_hex: &str) -> Web3Result<String> {
        self.request_string("eth_sendRawTransaction", vec![json!(with_hex_prefix(tx_hex))])
    }

    /// Number of transactions sent from `address` (its next nonce).
    pub fn get_tx_count(&mut self, address: &str, block: BlockTag) -> Web3Result<u128> {
        let raw = self.request_string(
            "eth_getTransactionCount",
            vec![json!(with_hex_prefix(address)), json!(block.as_param())],
        )?;
        parse_quantity(&raw)
    }

    /// Gas price in wei.
    pub fn get_gas_price(&mut self) -> Web3Result<u128> {
        let raw = self.request_string("eth_gasPrice", vec![])?;
        if strip_hex_prefix(&raw).is_empty() {
            return Err(Web3Error::NoGasPrice);
        }
        parse_quantity(&raw)
    }

    fn request_string(&mut self, method: &str, params: Vec<Value>) -> Web3Result<String> {
        match self.rpc.request(method, params)? {
            Value::String(s) => Ok(s),
            other => Err(Web3Error::UnexpectedResult(format!(
                "{} returned {}",
                method, other
            ))),
        }
    }
}

#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
impl Web3Client<crate::network::TlsConnector> {
    /// Creates a client over TLS sockets.
    pub fn tls(config: crate::rpc::RpcClientConfig) -> Web3Result<Self> {
        Ok(Self::new(RpcClient::tls(config)?))
    }
}
