// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Uniswap v2 pair reader.

use tracing::debug;

use super::abi::{read_address, read_string, read_words};
use super::client::{BlockTag, Web3Client};
use super::error::{Web3Error, Web3Result};
use crate::network::Connector;

/// `token0()`
pub const TOKEN0_SELECTOR: &str = "0dfe1681";
/// `token1()`
pub const TOKEN1_SELECTOR: &str = "d21220a7";
/// `decimals()`
pub const DECIMALS_SELECTOR: &str = "313ce567";
/// `getReserves()`
pub const GET_RESERVES_SELECTOR: &str = "0902f1ac";
/// `symbol()`
pub const SYMBOL_SELECTOR: &str = "95d89b41";

/// One ERC-20 side of a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: String,
    pub symbol: String,
    pub decimals: u32,
}

/// Tokens and reserves of an AMM pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairInfo {
    pub address: String,
    pub token0: TokenInfo,
    pub token1: TokenInfo,
    pub reserve0: u128,
    pub reserve1: u128,
}

impl PairInfo {
    /// Reserve of token 0 in whole tokens.
    pub fn liquidity0(&self) -> f64 {
        scale(self.reserve0, self.token0.decimals)
    }

    /// Reserve of token 1 in whole tokens.
    pub fn liquidity1(&self) -> f64 {
        scale(self.reserve1, self.token1.decimals)
    }

    /// Price of one token 0 in token 1. `None` when token 0 has no reserve.
    pub fn price(&self) -> Option<f64> {
        let liquidity0 = self.liquidity0();
        if liquidity0 == 0.0 {
            return None;
        }
        Some(self.liquidity1() / liquidity0)
    }
}

fn scale(amount: u128, decimals: u32) -> f64 {
    amount as f64 / 10f64.powi(decimals as i32)
}

/// Reads both tokens and the reserves of the pair at `pair_address`.
pub fn read_pair_info<C>(client: &mut Web3Client<C>, pair_address: &str) -> Web3Result<PairInfo>
where
    C: Connector + 'static,
    C::Transport: 'static,
{
    let token0 = read_token(client, pair_address, TOKEN0_SELECTOR)?;
    let token1 = read_token(client, pair_address, TOKEN1_SELECTOR)?;

    // Reserves are uint112, so they always fit the u128 word reader.
    let reserves = read_words(&client.call(pair_address, GET_RESERVES_SELECTOR, "", BlockTag::Latest)?)?;
    let (reserve0, reserve1) = match reserves.as_slice() {
        [reserve0, reserve1, ..] => (*reserve0, *reserve1),
        _ => return Err(Web3Error::Abi("getReserves returned fewer than 2 words".into())),
    };
    debug!("Pair reserves: {} {}", reserve0, reserve1);

    Ok(PairInfo {
        address: pair_address.to_string(),
        token0,
        token1,
        reserve0,
        reserve1,
    })
}

fn read_token<C>(client: &mut Web3Client<C>, pair_address: &str, selector: &str) -> Web3Result<TokenInfo>
where
    C: Connector + 'static,
    C::Transport: 'static,
{
    let address = read_address(&client.call(pair_address, selector, "", BlockTag::Latest)?)?;
    let symbol = read_string(&client.call(&address, SYMBOL_SELECTOR, "", BlockTag::Latest)?)?;

    let decimals = read_words(&client.call(&address, DECIMALS_SELECTOR, "", BlockTag::Latest)?)?
        .first()
        .copied()
        .ok_or_else(|| Web3Error::Abi("decimals returned no data".into()))?;
    let decimals = u32::try_from(decimals)
        .map_err(|_| Web3Error::Abi(format!("decimals {} out of range", decimals)))?;

    debug!(%address, %symbol, decimals, "Token read");
    Ok(TokenInfo {
        address,
        symbol,
        decimals,
    })
}
