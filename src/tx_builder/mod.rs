//! Token deploy transaction builder
//!
//! The builder is split into focused modules:
//! - **errors**: error taxonomy with retryability and categories
//! - **config**: explicit program ids, fee destination and endpoints
//! - **instructions**: instruction planning and order validation
//! - **metadata**: Token Metadata `CreateMetadataAccountV3` encoding
//! - **launch**: bonding-curve program PDAs and the dev-wallet buy
//! - **external**: trade API request and create-instruction extraction
//! - **upload**: off-chain metadata upload seam
//! - **chain**: RPC seam
//! - **output**: unsigned transaction plus generated mint key pair
//! - **builder**: `TokenDeployer` orchestrating the strategies
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use copymeme::tx_builder::{DeployConfig, DeployStrategy, HttpMetadataUploader, TokenDeployer};
//! use solana_client::nonblocking::rpc_client::RpcClient;
//! # use copymeme::types::TokenCreationRequest;
//! # use solana_sdk::pubkey::Pubkey;
//!
//! # async fn example(request: TokenCreationRequest, payer: Pubkey, fee: Pubkey) -> Result<(), copymeme::tx_builder::DeployError> {
//! let rpc = Arc::new(RpcClient::new("https://api.mainnet-beta.solana.com".to_string()));
//! let uploader = HttpMetadataUploader::new("https://uploader.example/upload");
//! let deployer = TokenDeployer::new(rpc, uploader, DeployConfig::new(fee));
//!
//! let built = deployer.build(DeployStrategy::Local, &request, &payer).await?;
//! println!("mint {}", built.mint());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod chain;
pub mod config;
pub mod errors;
pub mod external;
pub mod instructions;
pub mod launch;
pub mod metadata;
pub mod output;
pub mod upload;

pub use builder::{validate_request, DeployStrategy, TokenDeployer};
pub use chain::{decode_mint_decimals, ChainClient};
pub use config::{DeployConfig, LaunchProgramConfig, TradeApiConfig};
pub use errors::DeployError;
pub use instructions::{
    mint_amount, sanity_check_deploy_order, DeployStep, InstructionPlan, EXTERNAL_DEPLOY_SEQUENCE,
    LOCAL_DEPLOY_SEQUENCE,
};
pub use output::BuiltTransaction;
pub use upload::{HttpMetadataUploader, MetadataUploader, PumpIpfsUploader};
