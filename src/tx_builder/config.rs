//! Explicit builder configuration
//!
//! Fee destination, program ids and external endpoints are passed in at
//! construction time instead of living in process-wide constants.

use solana_sdk::{pubkey, pubkey::Pubkey};

/// Token Metadata program
pub const METADATA_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Launch (bonding-curve) program
pub const LAUNCH_PROGRAM_ID: Pubkey = pubkey!("6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P");
pub const LAUNCH_GLOBAL: Pubkey = pubkey!("4wTV1YmiEkRvAtNtsSGPtUrqRYQMe5SKy2uB4Jjaxnjf");
pub const LAUNCH_FEE_RECIPIENT: Pubkey = pubkey!("62qc2CNXwrYqQScmEdiZFFAnJR262PxWEuNQtxfafNgV");
pub const LAUNCH_EVENT_AUTHORITY: Pubkey = pubkey!("Ce6TQqeHC9p8KetsN6JsjHK7UTZk7nasjjnr7XxXp9F1");

/// 150,000 micro-lamports per compute unit
pub const DEFAULT_COMPUTE_UNIT_PRICE: u64 = 150_000;
/// Maximum compute units per transaction
pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 1_400_000;
/// 0.001 SOL
pub const DEFAULT_PLATFORM_FEE_LAMPORTS: u64 = 1_000_000;

/// Launch program accounts used by the external-trade variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchProgramConfig {
    pub program_id: Pubkey,
    pub global: Pubkey,
    pub fee_recipient: Pubkey,
    pub event_authority: Pubkey,
}

impl Default for LaunchProgramConfig {
    fn default() -> Self {
        Self {
            program_id: LAUNCH_PROGRAM_ID,
            global: LAUNCH_GLOBAL,
            fee_recipient: LAUNCH_FEE_RECIPIENT,
            event_authority: LAUNCH_EVENT_AUTHORITY,
        }
    }
}

/// Endpoints and sizing for the external-trade variant
#[derive(Debug, Clone, PartialEq)]
pub struct TradeApiConfig {
    /// Multipart image + metadata pinning endpoint
    pub ipfs_url: String,
    /// Trade-construction endpoint
    pub trade_url: String,
    /// Token amount requested with the external create
    pub create_amount: u64,
    /// Slippage percent sent to the trade API
    pub slippage_percent: u32,
    /// Priority fee in SOL sent to the trade API
    pub priority_fee_sol: f64,
    /// Pool identifier
    pub pool: String,
    /// Maximum SOL the local dev buy may spend
    pub dev_buy_max_sol: f64,
    /// Whole tokens bought by the local dev buy
    pub dev_buy_tokens: u64,
    /// Decimals the launch program mints with
    pub launch_decimals: u8,
}

impl Default for TradeApiConfig {
    fn default() -> Self {
        Self {
            ipfs_url: "https://pump.fun/api/ipfs".to_string(),
            trade_url: "https://pumpportal.fun/api/trade-local".to_string(),
            create_amount: 100_000,
            slippage_percent: 5,
            priority_fee_sol: 0.0005,
            pool: "pump".to_string(),
            dev_buy_max_sol: 0.01,
            dev_buy_tokens: 10_000,
            launch_decimals: 6,
        }
    }
}

/// Builder configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DeployConfig {
    /// Destination of the flat platform fee
    pub platform_fee_account: Pubkey,
    /// Flat platform fee in lamports
    pub platform_fee_lamports: u64,
    /// Priority fee in micro-lamports per compute unit
    pub compute_unit_price: u64,
    /// Compute unit limit
    pub compute_unit_limit: u32,
    /// Token Metadata program
    pub metadata_program: Pubkey,
    pub launch_program: LaunchProgramConfig,
    pub trade_api: TradeApiConfig,
}

impl DeployConfig {
    /// Defaults with the given fee destination
    pub fn new(platform_fee_account: Pubkey) -> Self {
        Self {
            platform_fee_account,
            platform_fee_lamports: DEFAULT_PLATFORM_FEE_LAMPORTS,
            compute_unit_price: DEFAULT_COMPUTE_UNIT_PRICE,
            compute_unit_limit: DEFAULT_COMPUTE_UNIT_LIMIT,
            metadata_program: METADATA_PROGRAM_ID,
            launch_program: LaunchProgramConfig::default(),
            trade_api: TradeApiConfig::default(),
        }
    }
}
