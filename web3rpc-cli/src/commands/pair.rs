// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pair Command
//!
//! Reads a Uniswap v2 style AMM pair and prints its reserves and price.

use anyhow::{Context, Result};
use web3rpc_core::web3::read_pair_info;

use crate::config::CliConfig;
use crate::display;

/// SushiSwap WETH/USDT pair on Polygon.
pub const DEFAULT_PAIR: &str = "0xc2755915a85c6f6c1c0f3a86ac8c058f11caa9c9";

pub fn run(pair_address: &str, config: &CliConfig) -> Result<()> {
    let mut client = config.client()?;
    display::info(&format!("Reading pair {} from {}", pair_address, config.node_url));

    let pair = read_pair_info(&mut client, pair_address)
        .with_context(|| format!("Cannot read pair {}", pair_address))?;
    display::display_pair(&pair);
    Ok(())
}
