//! DEX Zap Bot
//!
//! Plans one zap against a SecretSwap pair and prints the guarded batch.
//!
//! Usage:
//!   dexzap-bot --config config/zap.toml --pool-file data/pool.json
//!
//! The pool file is the raw answer to `{"pool":{}}` on the pair. The batch is
//! composed and dry-run submitted; signing and broadcasting happen outside
//! this binary.
//!
//! Created: 2026-10-19

use anyhow::{Context, Result};
use clap::Parser;
use dexzap_bot::{load_config, DryRunSubmitter, FilePoolQuerier, ZapPipeline};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Slippage-guarded swap + provide + stake for SecretSwap pairs
#[derive(Parser)]
#[command(name = "dexzap-bot")]
struct Args {
    /// TOML configuration (endpoint, sender, contract registry, pricing)
    #[arg(short, long, env = "ZAP_CONFIG", default_value = "config/zap.toml")]
    config: PathBuf,

    /// Captured `{"pool":{}}` query answer for the pair
    #[arg(short, long, env = "ZAP_POOL_FILE")]
    pool_file: PathBuf,

    /// Write the composed batch here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    let config = load_config(&args.config)?;
    info!("Configuration loaded from {} (chain: {})", args.config.display(), config.network.chain_id);
    info!("Endpoint: {}", config.network.endpoint);
    info!("Pair: {}", config.contracts.pair);
    info!("Investing {} of {}", config.zap.total_offer_amount, config.contracts.offer_token);

    let submitter = DryRunSubmitter::new(config.network.sender.clone());
    let pipeline = ZapPipeline::new(config, FilePoolQuerier::new(&args.pool_file), submitter);

    let (plan, receipt) = pipeline.run().await?;
    info!("Planned at {}", plan.planned_at.to_rfc3339());

    let rendered = serde_json::to_string_pretty(&receipt.payload)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write batch to {}", path.display()))?;
            info!("Batch written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
