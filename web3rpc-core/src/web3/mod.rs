// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Web3 Domain Client
//!
//! Typed wrappers for the `eth_*` methods used by wallets, ABI helpers for
//! reading `eth_call` results, and a Uniswap v2 pair reader built on both.

pub mod abi;
pub mod client;
pub mod error;
pub mod pair;

pub use abi::{
    decode_hex, parse_quantity, read_address, read_string, read_uint, read_words,
    strip_hex_prefix, with_hex_prefix, WORD_SIZE,
};
pub use client::{BlockTag, Web3Client};
pub use error::{Web3Error, Web3Result};
pub use pair::{read_pair_info, PairInfo, TokenInfo};
