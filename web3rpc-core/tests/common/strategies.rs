// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies

use proptest::prelude::*;

/// JSON-RPC method names.
pub fn method_strategy() -> impl Strategy<Value = String> {
    "(eth|net|web3)_[a-zA-Z]{1,20}"
}

/// Short lists of string params.
pub fn params_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9]{0,16}", 0..4)
}

/// A text message split into 1..8 non-empty fragments.
pub fn fragmented_text_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 {}:\",]{1,24}", 1..8)
}
