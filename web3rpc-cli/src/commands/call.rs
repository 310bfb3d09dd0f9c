// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Call Commands
//!
//! Contract calls and raw transaction broadcast.

use anyhow::{bail, Context, Result};
use web3rpc_core::web3::strip_hex_prefix;
use web3rpc_core::BlockTag;

use crate::config::CliConfig;
use crate::display;

/// Runs `eth_call` and prints the raw hex result.
pub fn call(
    contract: &str,
    selector: &str,
    data: Option<&str>,
    block: BlockTag,
    config: &CliConfig,
) -> Result<()> {
    let selector = strip_hex_prefix(selector);
    if selector.len() != 8 || !selector.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("Selector must be 4 bytes of hex, got '{}'", selector);
    }

    let mut client = config.client()?;
    let result = client
        .call(contract, selector, data.unwrap_or(""), block)
        .with_context(|| format!("eth_call to {} failed", contract))?;
    println!("{}", result);
    Ok(())
}

/// Broadcasts a signed transaction.
pub fn push_tx(tx_hex: &str, config: &CliConfig) -> Result<()> {
    if hex_is_empty(tx_hex) {
        bail!("Transaction data is empty");
    }

    let mut client = config.client()?;
    let tx_hash = client.push_tx(tx_hex).context("Broadcast failed")?;
    display::success("Transaction sent");
    display::field("Hash", &tx_hash);
    Ok(())
}

fn hex_is_empty(hex: &str) -> bool {
    strip_hex_prefix(hex.trim()).is_empty()
}
