//! Copy-deploy flow: discovered coin → new token on chain

use std::time::Instant;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use std::str::FromStr;
use tracing::warn;

use crate::structured_logging::DeployLogger;
use crate::tx_builder::{
    BuiltTransaction, ChainClient, DeployError, DeployStrategy, MetadataUploader, TokenDeployer,
};
use crate::types::{CoinListing, TokenCreationRequest};

/// Supply minted for every copy, in whole tokens
pub const COPY_TOTAL_SUPPLY: u64 = 1_000_000_000;
/// Decimals used when the source mint cannot be read
pub const FALLBACK_DECIMALS: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    pub total_supply: u64,
    pub fallback_decimals: u8,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            total_supply: COPY_TOTAL_SUPPLY,
            fallback_decimals: FALLBACK_DECIMALS,
        }
    }
}

/// Outcome of a confirmed copy deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReceipt {
    pub name: String,
    pub symbol: String,
    pub mint: Pubkey,
    pub signature: Signature,
    pub token_account: Pubkey,
}

/// Decimals of the coin being copied, or `fallback` when unreadable
pub async fn resolve_decimals<C: ChainClient + ?Sized>(chain: &C, original_mint: &str, fallback: u8) -> u8 {
    let mint = match Pubkey::from_str(original_mint) {
        Ok(mint) => mint,
        Err(e) => {
            warn!(mint = %original_mint, error = %e, fallback, "Source mint is not a pubkey, using fallback decimals");
            return fallback;
        }
    };

    match chain.get_mint_decimals(&mint).await {
        Ok(decimals) => decimals,
        Err(e) => {
            warn!(mint = %mint, error = %e, fallback, "Failed to read source decimals, using fallback");
            fallback
        }
    }
}

/// Resolve decimals and build the unsigned copy transaction
pub async fn prepare_copy<C, U>(
    deployer: &TokenDeployer<C, U>,
    listing: &CoinListing,
    payer: &Pubkey,
    strategy: DeployStrategy,
    options: CopyOptions,
    logger: &DeployLogger,
) -> Result<(TokenCreationRequest, BuiltTransaction), DeployError>
where
    C: ChainClient,
    U: MetadataUploader,
{
    let decimals = resolve_decimals(deployer.chain().as_ref(), &listing.id, options.fallback_decimals).await;
    logger.log_decimals_resolved(&listing.id, decimals);

    let request = TokenCreationRequest::from_listing(listing, decimals, options.total_supply);
    let built = deployer.build(strategy, &request, payer).await?;
    Ok((request, built))
}

/// Refresh the blockhash, sign with mint and payer, submit and confirm
pub async fn sign_and_submit<C: ChainClient + ?Sized>(
    chain: &C,
    mut built: BuiltTransaction,
    payer: &Keypair,
) -> Result<(Signature, BuiltTransaction), DeployError> {
    let blockhash = chain.get_latest_blockhash().await?;
    built.sign(payer, blockhash)?;
    let signature = chain.send_and_confirm(built.transaction()).await?;
    Ok((signature, built))
}

/// Copy a discovered coin: build, sign and confirm a new token deploy
pub async fn copy_deploy<C, U>(
    deployer: &TokenDeployer<C, U>,
    listing: &CoinListing,
    payer: &Keypair,
    strategy: DeployStrategy,
    options: CopyOptions,
) -> Result<DeployReceipt, DeployError>
where
    C: ChainClient,
    U: MetadataUploader,
{
    let logger = DeployLogger::generate();
    let started = Instant::now();

    let result = async {
        let (request, built) =
            prepare_copy(deployer, listing, &payer.pubkey(), strategy, options, &logger).await?;
        logger.log_deploy_attempt(&request.symbol, &strategy.to_string(), built.instructions().len());

        let (signature, built) = sign_and_submit(deployer.chain().as_ref(), built, payer).await?;
        Ok::<_, DeployError>(DeployReceipt {
            name: request.name,
            symbol: request.symbol,
            mint: built.mint(),
            signature,
            token_account: built.token_account(),
        })
    }
    .await;

    let latency_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(receipt) => logger.log_deploy_success(
            &receipt.mint.to_string(),
            &receipt.signature.to_string(),
            latency_ms,
        ),
        Err(e) => logger.log_deploy_failure(&listing.ticker, e.category(), &e.to_string(), latency_ms),
    }
    result
}
