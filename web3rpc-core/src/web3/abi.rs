// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! ABI Helpers
//!
//! Decoding of hex quantities and of the static/dynamic values returned by
//! `eth_call`. Integers are read into `u128`; wider values are rejected.

use super::error::{Web3Error, Web3Result};

/// Size of one ABI word in bytes.
pub const WORD_SIZE: usize = 32;

/// Half word: the bytes of a word that must be zero to fit in `u128`.
const HIGH_BYTES: usize = WORD_SIZE - 16;

/// Removes a leading `0x`/`0X`.
pub fn strip_hex_prefix(hex: &str) -> &str {
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

/// Adds a `0x` prefix unless one is already there.
pub fn with_hex_prefix(hex: &str) -> String {
    format!("0x{}", strip_hex_prefix(hex))
}

/// Parses a hex quantity such as `"0x3b9aca00"`. `"0x"` alone is zero.
pub fn parse_quantity(hex: &str) -> Web3Result<u128> {
    let digits = strip_hex_prefix(hex);
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| Web3Error::InvalidQuantity(format!("{}: {}", hex, e)))
}

/// Decodes hex data with or without prefix.
pub fn decode_hex(hex: &str) -> Web3Result<Vec<u8>> {
    hex::decode(strip_hex_prefix(hex)).map_err(|e| Web3Error::Abi(format!("invalid hex: {}", e)))
}

/// Reads the big-endian unsigned word starting at `offset` as a `u128`.
///
/// Words with any of their upper 128 bits set are an ABI error.
pub fn read_uint(data: &[u8], offset: usize) -> Web3Result<u128> {
    let word = offset
        .checked_add(WORD_SIZE)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| {
            Web3Error::Abi(format!(
                "no word at offset {} in {} bytes",
                offset,
                data.len()
            ))
        })?;

    if word[..HIGH_BYTES].iter().any(|b| *b != 0) {
        return Err(Web3Error::Abi(format!(
            "value at offset {} does not fit in 128 bits",
            offset
        )));
    }

    let mut low = [0u8; 16];
    low.copy_from_slice(&word[HIGH_BYTES..]);
    Ok(u128::from_be_bytes(low))
}

/// Decodes an ABI-encoded dynamic `string` return value.
pub fn read_string(hex: &str) -> Web3Result<String> {
    let data = decode_hex(hex)?;
    let offset = to_index(read_uint(&data, 0)?)?;
    let length = to_index(read_uint(&data, offset)?)?;
    let start = offset + WORD_SIZE;

    let bytes = start
        .checked_add(length)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| Web3Error::Abi(format!("string of {} bytes is truncated", length)))?;

    String::from_utf8(bytes.to_vec()).map_err(|_| Web3Error::Abi("string is not UTF-8".into()))
}

/// Reads an `address` return value: the last 20 bytes of the result.
pub fn read_address(hex: &str) -> Web3Result<String> {
    let digits = strip_hex_prefix(hex);
    if digits.len() < 40 || !digits.is_ascii() {
        return Err(Web3Error::Abi(format!("no address in {}", hex)));
    }
    let address = &digits[digits.len() - 40..];
    if !address.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Web3Error::Abi(format!("invalid address {}", address)));
    }
    Ok(format!("0x{}", address.to_ascii_lowercase()))
}

/// Reads every word of a static tuple return value.
pub fn read_words(hex: &str) -> Web3Result<Vec<u128>> {
    let data = decode_hex(hex)?;
    if data.len() % WORD_SIZE != 0 {
        return Err(Web3Error::Abi(format!(
            "{} bytes is not a whole number of words",
            data.len()
        )));
    }
    (0..data.len())
        .step_by(WORD_SIZE)
        .map(|offset| read_uint(&data, offset))
        .collect()
}

fn to_index(value: u128) -> Web3Result<usize> {
    usize::try_from(value).map_err(|_| Web3Error::Abi(format!("offset {} out of range", value)))
}
