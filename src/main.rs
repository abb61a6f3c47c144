//! copymeme - trending meme-coin discovery and copy-deploy CLI
//!
//! - `trending`: fetch the king of the hill and the filtered trending list
//! - `deploy`: copy a trending coin into a new token paid by the local wallet

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use copymeme::config::Config;
use copymeme::deploy::{copy_deploy, prepare_copy};
use copymeme::pump_api::{PartialCoinFilter, PumpApiClient};
use copymeme::structured_logging::DeployLogger;
use copymeme::tx_builder::{DeployStrategy, HttpMetadataUploader, TokenDeployer};
use copymeme::types::{CoinListing, TrendingFeed};
use copymeme::wallet::WalletManager;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the trending feed
    Trending {
        /// Print the feed as JSON
        #[arg(long)]
        json: bool,

        #[arg(long)]
        sort_by: Option<String>,

        #[arg(long)]
        market_cap_from: Option<f64>,

        #[arg(long)]
        volume_from: Option<f64>,

        #[arg(long)]
        holders_from: Option<u64>,
    },

    /// Copy a trending coin into a new token
    Deploy {
        /// Mint of the coin to copy
        #[arg(long)]
        mint: String,

        /// `local` or `external`
        #[arg(long, default_value = "local")]
        strategy: DeployStrategy,

        /// Build the transaction without signing or submitting it
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting copymeme");
    let config = load_config(&args.config)?;
    config.validate().context("Invalid configuration")?;

    let api = PumpApiClient::new(
        config.api.base_url.clone(),
        config.retry_policy(),
        config.coin_filter(),
    );

    match args.command {
        Command::Trending {
            json,
            sort_by,
            market_cap_from,
            volume_from,
            holders_from,
        } => {
            let filter = PartialCoinFilter {
                sort_by,
                market_cap_from,
                volume_from,
                num_holders_from: holders_from,
            };
            let feed = api.trending(&filter).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&feed)?);
            } else {
                print_feed(&feed);
            }
        }
        Command::Deploy {
            mint,
            strategy,
            dry_run,
        } => {
            let feed = api.trending(&PartialCoinFilter::default()).await;
            if let Some(error) = &feed.error {
                anyhow::bail!("{}", error);
            }
            let listing = find_listing(&feed, &mint)
                .with_context(|| format!("Coin {} is not in the trending feed", mint))?;

            let wallet = WalletManager::from_file(expand_home(&config.wallet.keypair_path))
                .context("Failed to load wallet")?;
            info!(wallet = %wallet.pubkey(), "Wallet loaded");

            let rpc = Arc::new(RpcClient::new_with_timeout_and_commitment(
                config.rpc.url.clone(),
                Duration::from_secs(config.rpc.timeout_secs),
                CommitmentConfig::confirmed(),
            ));
            let uploader = HttpMetadataUploader::new(config.deploy.metadata_upload_url.clone());
            let deployer = TokenDeployer::new(rpc, uploader, config.deploy_config()?);

            if dry_run {
                let logger = DeployLogger::generate();
                let (request, built) = prepare_copy(
                    &deployer,
                    listing,
                    &wallet.pubkey(),
                    strategy,
                    config.copy_options(),
                    &logger,
                )
                .await?;
                println!(
                    "{} ({}) decimals={} supply={} mint={} instructions={}",
                    request.name,
                    request.symbol,
                    request.decimals,
                    request.total_supply,
                    built.mint(),
                    built.instructions().len()
                );
                for (idx, step) in built.steps().iter().enumerate() {
                    println!("  {:>2}. {:?}", idx, step);
                }
            } else {
                let receipt = copy_deploy(
                    &deployer,
                    listing,
                    wallet.keypair(),
                    strategy,
                    config.copy_options(),
                )
                .await?;
                println!(
                    "Deployed {} ({}) mint={} signature={}",
                    receipt.name, receipt.symbol, receipt.mint, receipt.signature
                );
            }
        }
    }

    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "copymeme=debug,info"
    } else {
        "copymeme=info,warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| env_filter.into());

    #[cfg(feature = "json-logs")]
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json().with_target(true))
        .init();

    #[cfg(not(feature = "json-logs"))]
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        Ok(Config::from_env())
    }
}

fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => format!("{}/{}", home, rest),
        _ => path.to_string(),
    }
}

fn find_listing<'a>(feed: &'a TrendingFeed, mint: &str) -> Option<&'a CoinListing> {
    feed.king_of_the_hill
        .iter()
        .chain(feed.coins.iter())
        .find(|listing| listing.id == mint)
}

fn print_feed(feed: &TrendingFeed) {
    if let Some(error) = &feed.error {
        println!("error: {}", error);
    }
    if let Some(king) = &feed.king_of_the_hill {
        println!("👑 {} ({}) mcap={} {}", king.title, king.ticker, king.market_cap, king.id);
    }
    for coin in &feed.coins {
        println!(
            "{:<24} {:<10} mcap={:<14} replies={:<5} {}",
            coin.title, coin.ticker, coin.market_cap, coin.replies, coin.id
        );
    }
}
