// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Web3 Error Types

use thiserror::Error;

use crate::network::NetworkError;

/// Result type for domain client calls.
pub type Web3Result<T> = Result<T, Web3Error>;

/// Errors raised by the domain client and the ABI helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Web3Error {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Invalid hex quantity: {0}")]
    InvalidQuantity(String),

    #[error("ABI decoding failed: {0}")]
    Abi(String),

    #[error("Unexpected result type: {0}")]
    UnexpectedResult(String),

    #[error("Node has no gas price method")]
    NoGasPrice,
}
