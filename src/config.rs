//! Configuration module for copymeme
//!
//! This module handles all configuration loading from TOML files,
//! environment variables, and provides structured configuration types.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;

use crate::deploy::CopyOptions;
use crate::pump_api::{CoinFilter, RetryPolicy};
use crate::tx_builder::{DeployConfig, LaunchProgramConfig, TradeApiConfig};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listing proxy configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Default listing filters
    #[serde(default)]
    pub filters: FilterConfig,

    /// Deploy (transaction builder) configuration
    #[serde(default)]
    pub deploy: DeploySection,

    /// RPC configuration
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Wallet configuration
    #[serde(default)]
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the listing proxy
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_sort_by")]
    pub sort_by: String,

    #[serde(default = "default_market_cap_from")]
    pub market_cap_from: f64,

    #[serde(default = "default_volume_from")]
    pub volume_from: f64,

    #[serde(default = "default_holders_from")]
    pub num_holders_from: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploySection {
    /// Destination of the flat platform fee (base58)
    #[serde(default = "default_platform_fee_account")]
    pub platform_fee_account: String,

    /// Flat platform fee in lamports
    #[serde(default = "default_platform_fee_lamports")]
    pub platform_fee_lamports: u64,

    /// Priority fee in micro-lamports per compute unit
    #[serde(default = "default_compute_unit_price")]
    pub compute_unit_price: u64,

    /// Compute unit limit
    #[serde(default = "default_compute_unit_limit")]
    pub compute_unit_limit: u32,

    /// Permanent-storage upload endpoint for metadata JSON
    #[serde(default = "default_metadata_upload_url")]
    pub metadata_upload_url: String,

    /// Image and metadata pinning endpoint (multipart)
    #[serde(default = "default_ipfs_url")]
    pub ipfs_url: String,

    /// Trade-construction endpoint
    #[serde(default = "default_trade_api_url")]
    pub trade_api_url: String,

    /// Supply used when copying a listing
    #[serde(default = "default_copy_total_supply")]
    pub copy_total_supply: u64,

    /// Decimals used when the original mint cannot be read
    #[serde(default = "default_fallback_decimals")]
    pub fallback_decimals: u8,

    /// Maximum SOL spent by the dev buy in the external variant
    #[serde(default = "default_dev_buy_max_sol")]
    pub dev_buy_max_sol: f64,

    /// Token amount bought by the dev wallet in the external variant
    #[serde(default = "default_dev_buy_tokens")]
    pub dev_buy_tokens: u64,

    /// Launch program addresses
    #[serde(default)]
    pub launch_program: LaunchProgramSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchProgramSection {
    #[serde(default = "default_launch_program_id")]
    pub program_id: String,
    #[serde(default = "default_launch_global")]
    pub global: String,
    #[serde(default = "default_launch_fee_recipient")]
    pub fee_recipient: String,
    #[serde(default = "default_launch_event_authority")]
    pub event_authority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to keypair file
    #[serde(default = "default_keypair_path")]
    pub keypair_path: String,
}

// Default value functions
fn default_api_base_url() -> String { "https://copy-meme-murex.vercel.app/api/pump".to_string() }
fn default_max_retries() -> u32 { 3 }
fn default_retry_delay_ms() -> u64 { 1_000 }
fn default_sort_by() -> String { "creationTime".to_string() }
fn default_market_cap_from() -> f64 { 25_000.0 }
fn default_volume_from() -> f64 { 1.55 }
fn default_holders_from() -> u64 { 25 }
fn default_platform_fee_account() -> String { String::new() }
fn default_platform_fee_lamports() -> u64 { 1_000_000 }
fn default_compute_unit_price() -> u64 { 150_000 }
fn default_compute_unit_limit() -> u32 { 1_400_000 }
fn default_metadata_upload_url() -> String { "https://uploader.irys.xyz/upload".to_string() }
fn default_ipfs_url() -> String { "https://pump.fun/api/ipfs".to_string() }
fn default_trade_api_url() -> String { "https://pumpportal.fun/api/trade-local".to_string() }
fn default_copy_total_supply() -> u64 { 1_000_000_000 }
fn default_fallback_decimals() -> u8 { 9 }
fn default_dev_buy_max_sol() -> f64 { 0.01 }
fn default_dev_buy_tokens() -> u64 { 10_000 }
fn default_launch_program_id() -> String { "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P".to_string() }
fn default_launch_global() -> String { "4wTV1YmiEkRvAtNtsSGPtUrqRYQMe5SKy2uB4Jjaxnjf".to_string() }
fn default_launch_fee_recipient() -> String { "62qc2CNXwrYqQScmEdiZFFAnJR262PxWEuNQtxfafNgV".to_string() }
fn default_launch_event_authority() -> String { "Ce6TQqeHC9p8KetsN6JsjHK7UTZk7nasjjnr7XxXp9F1".to_string() }
fn default_rpc_url() -> String { "https://api.mainnet-beta.solana.com".to_string() }
fn default_rpc_timeout() -> u64 { 30 }
fn default_keypair_path() -> String { "~/.config/solana/id.json".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            sort_by: default_sort_by(),
            market_cap_from: default_market_cap_from(),
            volume_from: default_volume_from(),
            num_holders_from: default_holders_from(),
        }
    }
}

impl Default for LaunchProgramSection {
    fn default() -> Self {
        Self {
            program_id: default_launch_program_id(),
            global: default_launch_global(),
            fee_recipient: default_launch_fee_recipient(),
            event_authority: default_launch_event_authority(),
        }
    }
}

impl Default for DeploySection {
    fn default() -> Self {
        Self {
            platform_fee_account: default_platform_fee_account(),
            platform_fee_lamports: default_platform_fee_lamports(),
            compute_unit_price: default_compute_unit_price(),
            compute_unit_limit: default_compute_unit_limit(),
            metadata_upload_url: default_metadata_upload_url(),
            ipfs_url: default_ipfs_url(),
            trade_api_url: default_trade_api_url(),
            copy_total_supply: default_copy_total_supply(),
            fallback_decimals: default_fallback_decimals(),
            dev_buy_max_sol: default_dev_buy_max_sol(),
            dev_buy_tokens: default_dev_buy_tokens(),
            launch_program: LaunchProgramSection::default(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            timeout_secs: default_rpc_timeout(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: default_keypair_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            filters: FilterConfig::default(),
            deploy: DeploySection::default(),
            rpc: RpcConfig::default(),
            wallet: WalletConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Defaults plus environment overrides, used when no file exists
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `COPYMEME_*` overrides; unparsable numbers keep the current value
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("COPYMEME_SORT_BY").filter(|v| !v.is_empty()) {
            self.filters.sort_by = v;
        }
        if let Some(v) = lookup("COPYMEME_MARKET_CAP_FROM").and_then(|v| v.parse().ok()) {
            self.filters.market_cap_from = v;
        }
        if let Some(v) = lookup("COPYMEME_VOLUME_FROM").and_then(|v| v.parse().ok()) {
            self.filters.volume_from = v;
        }
        if let Some(v) = lookup("COPYMEME_HOLDERS_FROM").and_then(|v| v.parse().ok()) {
            self.filters.num_holders_from = v;
        }
        if let Some(v) = lookup("COPYMEME_PLATFORM_FEE_ACCOUNT").filter(|v| !v.is_empty()) {
            self.deploy.platform_fee_account = v;
        }
        if let Some(v) = lookup("COPYMEME_RPC_URL").filter(|v| !v.is_empty()) {
            self.rpc.url = v;
        }
    }

    /// Validate the listing side of the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if self.api.retry_delay_ms == 0 {
            anyhow::bail!("api.retry_delay_ms must be > 0");
        }
        if self.rpc.url.trim().is_empty() {
            anyhow::bail!("rpc.url must not be empty");
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.api.max_retries,
            Duration::from_millis(self.api.retry_delay_ms),
        )
    }

    pub fn coin_filter(&self) -> CoinFilter {
        CoinFilter {
            sort_by: self.filters.sort_by.clone(),
            market_cap_from: self.filters.market_cap_from,
            volume_from: self.filters.volume_from,
            num_holders_from: self.filters.num_holders_from,
        }
    }

    pub fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            total_supply: self.deploy.copy_total_supply,
            fallback_decimals: self.deploy.fallback_decimals,
        }
    }

    /// Resolve the deploy section into the builder's configuration object
    pub fn deploy_config(&self) -> anyhow::Result<DeployConfig> {
        let deploy = &self.deploy;
        if deploy.platform_fee_account.is_empty() {
            anyhow::bail!(
                "deploy.platform_fee_account is not set (or COPYMEME_PLATFORM_FEE_ACCOUNT)"
            );
        }
        for (name, url) in [
            ("deploy.metadata_upload_url", &deploy.metadata_upload_url),
            ("deploy.ipfs_url", &deploy.ipfs_url),
            ("deploy.trade_api_url", &deploy.trade_api_url),
        ] {
            if url.trim().is_empty() {
                anyhow::bail!("{} must not be empty", name);
            }
        }

        let launch = &deploy.launch_program;
        let fee_account = parse_pubkey("deploy.platform_fee_account", &deploy.platform_fee_account)?;
        Ok(DeployConfig {
            platform_fee_lamports: deploy.platform_fee_lamports,
            compute_unit_price: deploy.compute_unit_price,
            compute_unit_limit: deploy.compute_unit_limit,
            launch_program: LaunchProgramConfig {
                program_id: parse_pubkey("launch_program.program_id", &launch.program_id)?,
                global: parse_pubkey("launch_program.global", &launch.global)?,
                fee_recipient: parse_pubkey("launch_program.fee_recipient", &launch.fee_recipient)?,
                event_authority: parse_pubkey("launch_program.event_authority", &launch.event_authority)?,
            },
            trade_api: TradeApiConfig {
                ipfs_url: deploy.ipfs_url.clone(),
                trade_url: deploy.trade_api_url.clone(),
                dev_buy_max_sol: deploy.dev_buy_max_sol,
                dev_buy_tokens: deploy.dev_buy_tokens,
                ..TradeApiConfig::default()
            },
            ..DeployConfig::new(fee_account)
        })
    }
}

fn parse_pubkey(field: &str, value: &str) -> anyhow::Result<Pubkey> {
    Pubkey::from_str(value).map_err(|e| anyhow::anyhow!("{} is not a valid pubkey: {}", field, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_match_listing_filters() {
        let config = Config::default();
        assert_eq!(config.filters.sort_by, "creationTime");
        assert_eq!(config.filters.market_cap_from, 25_000.0);
        assert_eq!(config.filters.volume_from, 1.55);
        assert_eq!(config.filters.num_holders_from, 25);
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.api.retry_delay_ms, 1_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[filters]
sort_by = "marketCap"

[deploy]
platform_fee_account = "11111111111111111111111111111111"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.filters.sort_by, "marketCap");
        assert_eq!(config.filters.num_holders_from, 25);
        assert_eq!(config.deploy.compute_unit_limit, 1_400_000);

        let deploy = config.deploy_config().unwrap();
        assert_eq!(deploy.platform_fee_account, Pubkey::default());
        assert_eq!(deploy.platform_fee_lamports, 1_000_000);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("COPYMEME_SORT_BY", "volume"),
            ("COPYMEME_MARKET_CAP_FROM", "5000"),
            ("COPYMEME_HOLDERS_FROM", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.filters.sort_by, "volume");
        assert_eq!(config.filters.market_cap_from, 5000.0);
        assert_eq!(config.filters.num_holders_from, 25);
    }

    #[test]
    fn test_deploy_config_requires_fee_account() {
        let config = Config::default();
        assert!(config.deploy_config().is_err());

        let mut config = Config::default();
        config.deploy.platform_fee_account = "not-base58!".to_string();
        assert!(config.deploy_config().is_err());
    }

    #[test]
    fn test_zero_retry_delay_rejected() {
        let mut config = Config::default();
        config.api.retry_delay_ms = 0;
        assert!(config.validate().is_err());
    }
}
