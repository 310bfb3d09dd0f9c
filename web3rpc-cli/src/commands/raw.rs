// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Raw Command
//!
//! Sends any JSON-RPC method and prints the result as JSON.

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::config::CliConfig;

pub fn run(method: &str, params: Option<&str>, config: &CliConfig) -> Result<()> {
    let params = parse_params(params)?;

    let mut client = config.client()?;
    let result = client
        .rpc()
        .request(method, params)
        .with_context(|| format!("{} failed", method))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Parses the params argument; must be a JSON array when given.
fn parse_params(params: Option<&str>) -> Result<Vec<Value>> {
    let Some(text) = params else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Value>(text).context("Params are not valid JSON")? {
        Value::Array(items) => Ok(items),
        other => bail!("Params must be a JSON array, got {}", other),
    }
}
