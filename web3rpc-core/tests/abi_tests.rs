// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for web3::abi

use web3rpc_core::web3::*;

/// ABI encoding of the string "USDT" as returned by `symbol()`.
const USDT_SYMBOL: &str = "0x\
    0000000000000000000000000000000000000000000000000000000000000020\
    0000000000000000000000000000000000000000000000000000000000000004\
    5553445400000000000000000000000000000000000000000000000000000000";

#[test]
fn test_parse_quantity() {
    assert_eq!(parse_quantity("0x3b9aca00").unwrap(), 1_000_000_000);
    assert_eq!(parse_quantity("0x0").unwrap(), 0);
    assert_eq!(parse_quantity("0x").unwrap(), 0);
    assert_eq!(parse_quantity("ff").unwrap(), 255);
}

#[test]
fn test_parse_quantity_rejects_garbage_and_overflow() {
    assert!(matches!(parse_quantity("0xzz"), Err(Web3Error::InvalidQuantity(_))));
    let too_wide = format!("0x1{}", "0".repeat(32));
    assert!(matches!(parse_quantity(&too_wide), Err(Web3Error::InvalidQuantity(_))));
}

#[test]
fn test_hex_prefix_helpers() {
    assert_eq!(strip_hex_prefix("0xabc"), "abc");
    assert_eq!(strip_hex_prefix("0Xabc"), "abc");
    assert_eq!(strip_hex_prefix("abc"), "abc");
    assert_eq!(with_hex_prefix("abc"), "0xabc");
    assert_eq!(with_hex_prefix("0xabc"), "0xabc");
}

#[test]
fn test_read_uint() {
    let mut data = vec![0u8; 64];
    data[63] = 18;
    assert_eq!(read_uint(&data, 0).unwrap(), 0);
    assert_eq!(read_uint(&data, 32).unwrap(), 18);
    assert!(read_uint(&data, 40).is_err());
    assert!(read_uint(&data, usize::MAX).is_err());
}

#[test]
fn test_read_uint_overflow() {
    let mut data = vec![0u8; 32];
    data[0] = 1;
    assert!(matches!(read_uint(&data, 0), Err(Web3Error::Abi(_))));
}

#[test]
fn test_read_string() {
    assert_eq!(read_string(USDT_SYMBOL).unwrap(), "USDT");
}

#[test]
fn test_read_string_truncated() {
    let truncated = &USDT_SYMBOL[..USDT_SYMBOL.len() - 64];
    assert!(read_string(truncated).is_err());
}

#[test]
fn test_read_address_takes_last_20_bytes() {
    let word = "0x000000000000000000000000C2132D05D31C914A87C6611C10748AEB04B58E8F";
    assert_eq!(
        read_address(word).unwrap(),
        "0xc2132d05d31c914a87c6611c10748aeb04b58e8f"
    );
    assert!(read_address("0x1234").is_err());
}

#[test]
fn test_read_words() {
    let reserves = format!("0x{:064x}{:064x}{:064x}", 1_000u128, 2_500u128, 1_700_000_000u128);
    assert_eq!(read_words(&reserves).unwrap(), vec![1_000, 2_500, 1_700_000_000]);
    assert!(read_words("0x1234").is_err());
    assert_eq!(read_words("0x").unwrap(), Vec::<u128>::new());
}

#[test]
fn test_decode_hex() {
    assert_eq!(decode_hex("0x0102").unwrap(), vec![1, 2]);
    assert!(matches!(decode_hex("0x123"), Err(Web3Error::Abi(_))));
}
