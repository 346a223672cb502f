//! dex-glue command line.
//!
//! ```text
//! config file ─▶ ProviderSet (mainnet / local / extension) ─▶ ConfirmationTracker
//!                       │                                           ▲
//!                       └── signer (local wallet | extension) ──────┘ Shutdown (Ctrl-C)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use alloy::primitives::TxHash;
use clap::{Parser, Subcommand};
use serde_json::json;

use dex_glue::blockchain::{ConfirmationTracker, Environment, PollPolicy, ProviderSet, TransactionState};
use dex_glue::config::validation::validate_config;
use dex_glue::config::{load_config, AppConfig, ConfigError};
use dex_glue::lifecycle::{signals, Shutdown};
use dex_glue::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "dex-glue")]
#[command(about = "Node connection and transaction confirmation helper for DEX examples", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured environment (production, local, browser-extension).
    #[arg(short, long)]
    env: Option<Environment>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the selected endpoint, chain and wallet
    Status,
    /// Link the wallet extension account
    Connect,
    /// Wait until a transaction is mined
    Watch {
        /// Transaction hash (0x-prefixed)
        tx_hash: TxHash,
    },
    /// Print the trade inputs, with optional overrides
    Trade {
        /// Input token symbol (USDC, WETH)
        #[arg(long)]
        token_in: Option<String>,
        /// Output token symbol (USDC, WETH)
        #[arg(long)]
        token_out: Option<String>,
        /// Human-readable input amount, e.g. 1000
        #[arg(long)]
        amount: Option<String>,
        /// Pool fee tier in hundredths of a bip (100, 500, 3000, 10000)
        #[arg(long)]
        fee: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(env) = cli.env {
        config.env = env;
    }

    logging::init(&config.observability);
    tracing::info!(env = %config.env, "dex-glue v0.1.0 starting");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let mut providers = ProviderSet::new(&config)?;
    let tracker = ConfirmationTracker::new(PollPolicy::from(&config.tracker));

    match cli.command {
        Commands::Status => status(&providers, &config).await,
        Commands::Connect => {
            match providers.connect_browser_extension_wallet().await? {
                Some(address) => println!("{}", json!({ "connected": true, "address": address })),
                None => println!("{}", json!({ "connected": false })),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Watch { tx_hash } => {
            let shutdown = Shutdown::new();
            let signal_task = signals::spawn_signal_handler(&shutdown);
            let mut cancel = shutdown.subscribe();

            let state = tracker
                .await_confirmation_until(tx_hash, providers.receipt_source(), Some(&mut cancel))
                .await;
            signal_task.abort();

            println!("{}", json!({ "tx_hash": tx_hash, "state": state }));
            Ok(if state == TransactionState::Sent {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Trade { token_in, token_out, amount, fee } => {
            config.tokens.apply_overrides(
                token_in.as_deref(),
                token_out.as_deref(),
                amount.as_deref(),
                fee,
            )?;
            validate_config(&config).map_err(ConfigError::Validation)?;

            let trade = &config.tokens;
            let output = json!({
                "in": trade.token_in,
                "out": trade.token_out,
                "amount_in": trade.amount_in,
                "amount_in_base_units": trade.amount_in_base_units()?.to_string(),
                "pool_fee": trade.pool_fee.fee(),
                "tick_spacing": trade.pool_fee.tick_spacing(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn status(providers: &ProviderSet, config: &AppConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let Some(client) = providers.provider() else {
        println!(
            "{}",
            json!({ "env": providers.environment(), "endpoint": null, "healthy": false })
        );
        return Ok(ExitCode::FAILURE);
    };

    let chain_id = client.get_chain_id().await.ok().map(|id| id.0);
    let block_number = client.get_block_number().await.ok();
    let healthy = client.is_healthy().await;

    if providers.environment().uses_local_wallet() {
        if let Err(e) = client.verify_chain_id(config.wallet.chain_id).await {
            tracing::warn!(error = %e, "Wallet chain does not match endpoint");
        }
    }

    let output = json!({
        "env": providers.environment(),
        "endpoint": client.name(),
        "rpc_url": client.rpc_url(),
        "chain_id": chain_id,
        "block_number": block_number,
        "wallet_address": providers.wallet_address(),
        "healthy": healthy,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(if healthy { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
