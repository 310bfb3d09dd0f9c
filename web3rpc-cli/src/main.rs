// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! web3rpc CLI
//!
//! Command-line interface for querying a blockchain node over JSON-RPC.

mod commands;
mod config;
mod display;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use web3rpc_core::BlockTag;

use config::{CliConfig, DEFAULT_NODE_URL};

#[derive(Parser)]
#[command(name = "web3rpc")]
#[command(version, about = "JSON-RPC client for blockchain nodes over WebSocket and HTTPS")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Node URL (wss:// or https://)
    #[arg(
        long,
        global = true,
        env = "WEB3RPC_NODE_URL",
        default_value = DEFAULT_NODE_URL
    )]
    node: String,

    /// User-Agent sent to the node
    #[arg(long, global = true, default_value = web3rpc_core::rpc::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Attempts per request
    #[arg(long, global = true, default_value = "3")]
    retries: u32,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current gas price
    GasPrice,

    /// Show the native token balance of an address
    Balance {
        /// Account address
        address: String,

        /// Block tag (latest, earliest, pending or a number)
        #[arg(long, default_value = "latest")]
        block: BlockTag,
    },

    /// Show the number of transactions sent from an address
    TxCount {
        /// Account address
        address: String,

        /// Block tag (latest, earliest, pending or a number)
        #[arg(long, default_value = "latest")]
        block: BlockTag,
    },

    /// Call a contract method and print the raw result
    Call {
        /// Contract address
        contract: String,

        /// 4-byte method selector in hex
        selector: String,

        /// ABI-encoded arguments in hex
        data: Option<String>,

        /// Block tag (latest, earliest, pending or a number)
        #[arg(long, default_value = "latest")]
        block: BlockTag,
    },

    /// Broadcast a signed raw transaction
    PushTx {
        /// Signed transaction in hex
        tx_hex: String,
    },

    /// Send any JSON-RPC method
    Raw {
        /// Method name (e.g. eth_blockNumber)
        method: String,

        /// Params as a JSON array
        params: Option<String>,
    },

    /// Show tokens, reserves and price of an AMM pair
    Pair {
        /// Pair contract address
        #[arg(default_value = commands::pair::DEFAULT_PAIR)]
        address: String,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("web3rpc_core=debug,web3rpc=debug"),
        _ => EnvFilter::new("web3rpc_core=trace,web3rpc=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = CliConfig {
        node_url: cli.node,
        user_agent: cli.user_agent,
        retries: cli.retries,
    };

    match cli.command {
        Commands::GasPrice => commands::query::gas_price(&config),
        Commands::Balance { address, block } => commands::query::balance(&address, block, &config),
        Commands::TxCount { address, block } => commands::query::tx_count(&address, block, &config),
        Commands::Call {
            contract,
            selector,
            data,
            block,
        } => commands::call::call(&contract, &selector, data.as_deref(), block, &config),
        Commands::PushTx { tx_hex } => commands::call::push_tx(&tx_hex, &config),
        Commands::Raw { method, params } => commands::raw::run(&method, params.as_deref(), &config),
        Commands::Pair { address } => commands::pair::run(&address, &config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        display::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
