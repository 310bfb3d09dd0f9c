// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI Configuration

use anyhow::{Context, Result};
use web3rpc_core::{RpcClientConfig, TlsConnector, Web3Client};

/// Polygon mainnet node used when `--node` is not given.
pub const DEFAULT_NODE_URL: &str = "https://matic-mainnet.chainstacklabs.com";

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Node URL (`wss://` or `https://`).
    pub node_url: String,
    /// User-Agent sent to the node.
    pub user_agent: String,
    /// Attempts per request.
    pub retries: u32,
}

impl CliConfig {
    pub fn rpc_config(&self) -> RpcClientConfig {
        RpcClientConfig::new(self.node_url.clone())
            .with_user_agent(self.user_agent.clone())
            .with_retries(self.retries)
    }

    /// Builds a client for the configured node. Nothing is sent yet.
    pub fn client(&self) -> Result<Web3Client<TlsConnector>> {
        Web3Client::tls(self.rpc_config())
            .with_context(|| format!("Cannot use node URL {}", self.node_url))
    }
}
