// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Display Helpers
//!
//! Styled terminal output.

use console::style;
use web3rpc_core::PairInfo;

/// Wei per gwei.
const GWEI: f64 = 1e9;
/// Wei per ether.
const ETHER: f64 = 1e18;

pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

pub fn info(msg: &str) {
    println!("{} {}", style("→").cyan(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Labelled value line.
pub fn field(label: &str, value: &str) {
    println!("  {:<10} {}", style(label).dim(), value);
}

pub fn format_gwei(wei: u128) -> String {
    format!("{} wei ({:.3} gwei)", wei, wei as f64 / GWEI)
}

pub fn format_ether(wei: u128) -> String {
    format!("{} wei ({:.6})", wei, wei as f64 / ETHER)
}

pub fn display_pair(pair: &PairInfo) {
    println!();
    println!(
        "  {}",
        style(format!(
            "Uniswap v2 pair: {} - {}",
            pair.token0.symbol, pair.token1.symbol
        ))
        .bold()
        .cyan()
    );
    println!();
    field("Pair", &pair.address);
    println!();

    for (name, token, liquidity) in [
        ("Token 0", &pair.token0, pair.liquidity0()),
        ("Token 1", &pair.token1, pair.liquidity1()),
    ] {
        println!("  {} {}", style(name).bold(), token.symbol);
        field("Address", &token.address);
        field("Decimals", &token.decimals.to_string());
        field("Reserve", &format!("{} {}", liquidity, token.symbol));
        println!();
    }

    match pair.price() {
        Some(price) => field(
            "Price",
            &format!("1 {} = {} {}", pair.token0.symbol, price, pair.token1.symbol),
        ),
        None => warning("Token 0 has no reserve, price undefined"),
    }
    println!();
}
