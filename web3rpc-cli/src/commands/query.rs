// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Query Commands
//!
//! Gas price, balance and transaction count.

use anyhow::{Context, Result};
use web3rpc_core::BlockTag;

use crate::config::CliConfig;
use crate::display;

pub fn gas_price(config: &CliConfig) -> Result<()> {
    let mut client = config.client()?;
    let wei = client.get_gas_price().context("Cannot read gas price")?;
    display::field("Gas price", &display::format_gwei(wei));
    Ok(())
}

pub fn balance(address: &str, block: BlockTag, config: &CliConfig) -> Result<()> {
    let mut client = config.client()?;
    let wei = client
        .get_balance(address, block)
        .with_context(|| format!("Cannot read balance of {}", address))?;
    display::field("Address", address);
    display::field("Block", &block.to_string());
    display::field("Balance", &display::format_ether(wei));
    Ok(())
}

pub fn tx_count(address: &str, block: BlockTag, config: &CliConfig) -> Result<()> {
    let mut client = config.client()?;
    let count = client
        .get_tx_count(address, block)
        .with_context(|| format!("Cannot read transaction count of {}", address))?;
    display::field("Address", address);
    display::field("Block", &block.to_string());
    display::field("Tx count", &count.to_string());
    Ok(())
}
