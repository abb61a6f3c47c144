//! Core deploy transaction builder
//!
//! `TokenDeployer` composes the metadata upload, chain queries and the
//! instruction planner into a single unsigned transaction. Two strategies
//! are supported:
//! - **Local**: every instruction is built here (mint, metadata, revokes, fee)
//! - **ExternalTrade**: the launch program's create instruction comes from the
//!   trade API, followed by a locally built dev-wallet buy
//!
//! Each call generates a fresh mint key pair, so two builds of the same
//! request never share a mint.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use spl_associated_token_account::{get_associated_token_address, instruction::create_associated_token_account};
use spl_token::solana_program::program_pack::Pack;
use tracing::{debug, info};

use super::chain::ChainClient;
use super::config::DeployConfig;
use super::errors::DeployError;
use super::external::{extract_create_instruction, request_create_transaction, CreateTradeRequest, TokenMetadataFields};
use super::instructions::{
    mint_amount, plan_local_deploy, push_compute_budget, sanity_check_deploy_order, DeployStep,
    InstructionPlan, LocalDeployParams, EXTERNAL_DEPLOY_SEQUENCE, LOCAL_DEPLOY_SEQUENCE,
};
use super::launch::{buy_instruction, BuyParams};
use super::metadata::{MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH, MAX_URI_LENGTH};
use super::output::BuiltTransaction;
use super::upload::{MetadataUploader, PumpIpfsUploader};
use crate::types::{MetadataDocument, TokenCreationRequest};

/// How the deploy transaction is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployStrategy {
    #[default]
    Local,
    ExternalTrade,
}

impl fmt::Display for DeployStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::ExternalTrade => write!(f, "external"),
        }
    }
}

impl FromStr for DeployStrategy {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "external" | "external-trade" => Ok(Self::ExternalTrade),
            other => Err(DeployError::Configuration(format!("unknown deploy strategy '{}'", other))),
        }
    }
}

/// Deploy transaction builder
pub struct TokenDeployer<C: ChainClient, U: MetadataUploader> {
    chain: Arc<C>,
    uploader: U,
    pinner: PumpIpfsUploader,
    http: reqwest::Client,
    config: DeployConfig,
}

impl<C: ChainClient, U: MetadataUploader> TokenDeployer<C, U> {
    pub fn new(chain: Arc<C>, uploader: U, config: DeployConfig) -> Self {
        Self::with_http(chain, uploader, config, reqwest::Client::new())
    }

    pub fn with_http(chain: Arc<C>, uploader: U, config: DeployConfig, http: reqwest::Client) -> Self {
        let pinner = PumpIpfsUploader::new(http.clone(), config.trade_api.ipfs_url.clone());
        Self {
            chain,
            uploader,
            pinner,
            http,
            config,
        }
    }

    pub fn chain(&self) -> &Arc<C> {
        &self.chain
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    /// Build an unsigned deploy transaction for `request` paid by `payer`
    pub async fn build(
        &self,
        strategy: DeployStrategy,
        request: &TokenCreationRequest,
        payer: &Pubkey,
    ) -> Result<BuiltTransaction, DeployError> {
        validate_request(request)?;
        info!(
            strategy = %strategy,
            name = %request.name,
            symbol = %request.symbol,
            payer = %payer,
            "Building deploy transaction"
        );

        match strategy {
            DeployStrategy::Local => self.build_local(request, payer).await,
            DeployStrategy::ExternalTrade => self.build_external(request, payer).await,
        }
    }

    async fn build_local(
        &self,
        request: &TokenCreationRequest,
        payer: &Pubkey,
    ) -> Result<BuiltTransaction, DeployError> {
        let uri = self
            .uploader
            .upload_json(&MetadataDocument::from_request(request))
            .await?;
        if uri.is_empty() {
            return Err(DeployError::upload_rejected("uploader returned an empty uri"));
        }
        if uri.len() > MAX_URI_LENGTH {
            return Err(DeployError::upload_rejected(format!("metadata uri longer than {} bytes", MAX_URI_LENGTH)));
        }

        let rent_lamports = self
            .chain
            .get_minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN)
            .await?;

        let mint_keypair = Keypair::new();
        let mint = mint_keypair.pubkey();
        let token_account = get_associated_token_address(payer, &mint);

        let plan = plan_local_deploy(
            &self.config,
            &LocalDeployParams {
                payer: *payer,
                mint,
                token_account,
                rent_lamports,
                decimals: request.decimals,
                total_supply: request.total_supply,
                name: &request.name,
                symbol: &request.symbol,
                metadata_uri: &uri,
            },
        )?;
        sanity_check_deploy_order(&plan, &LOCAL_DEPLOY_SEQUENCE)?;

        debug!(mint = %mint, rent_lamports, instructions = plan.len(), "Local plan ready");
        self.finish(plan, payer, mint_keypair, token_account).await
    }

    async fn build_external(
        &self,
        request: &TokenCreationRequest,
        payer: &Pubkey,
    ) -> Result<BuiltTransaction, DeployError> {
        let trade = &self.config.trade_api;
        let launch = &self.config.launch_program;

        let mint_keypair = Keypair::new();
        let mint = mint_keypair.pubkey();

        let uri = self.pinner.upload_with_image(request).await?;

        let body = CreateTradeRequest::new(
            trade,
            payer,
            &mint,
            TokenMetadataFields {
                name: &request.name,
                symbol: &request.symbol,
                uri: &uri,
            },
        );
        let blob = request_create_transaction(&self.http, &trade.trade_url, &body).await?;
        let create_ix = extract_create_instruction(&blob, &launch.program_id)?;

        let token_account = get_associated_token_address(payer, &mint);
        let buy_ix = buy_instruction(
            launch,
            payer,
            &mint,
            &BuyParams {
                tokens: trade.dev_buy_tokens,
                decimals: trade.launch_decimals,
                max_sol_cost: trade.dev_buy_max_sol,
            },
        )?;

        let mut plan = InstructionPlan::with_capacity(EXTERNAL_DEPLOY_SEQUENCE.len());
        push_compute_budget(&mut plan, &self.config);
        plan.push(DeployStep::LaunchCreate, create_ix);
        plan.push(
            DeployStep::CreateTokenAccount,
            create_associated_token_account(payer, payer, &mint, &spl_token::id()),
        );
        plan.push(DeployStep::LaunchBuy, buy_ix);
        sanity_check_deploy_order(&plan, &EXTERNAL_DEPLOY_SEQUENCE)?;

        debug!(mint = %mint, uri = %uri, "External plan ready");
        self.finish(plan, payer, mint_keypair, token_account).await
    }

    /// Attach a fresh blockhash and wrap the plan
    async fn finish(
        &self,
        plan: InstructionPlan,
        payer: &Pubkey,
        mint_keypair: Keypair,
        token_account: Pubkey,
    ) -> Result<BuiltTransaction, DeployError> {
        let blockhash = self.chain.get_latest_blockhash().await?;
        let mut transaction = Transaction::new_with_payer(plan.instructions(), Some(payer));
        transaction.message.recent_blockhash = blockhash;

        info!(
            mint = %mint_keypair.pubkey(),
            token_account = %token_account,
            instructions = plan.len(),
            "Deploy transaction built"
        );
        Ok(BuiltTransaction::new(transaction, plan, mint_keypair, token_account))
    }
}

/// Reject requests the chain programs would refuse
pub fn validate_request(request: &TokenCreationRequest) -> Result<(), DeployError> {
    if request.name.trim().is_empty() {
        return Err(DeployError::InvalidRequest("name must not be empty".into()));
    }
    if request.symbol.trim().is_empty() {
        return Err(DeployError::InvalidRequest("symbol must not be empty".into()));
    }
    if request.name.len() > MAX_NAME_LENGTH {
        return Err(DeployError::InvalidRequest(format!(
            "name longer than {} bytes",
            MAX_NAME_LENGTH
        )));
    }
    if request.symbol.len() > MAX_SYMBOL_LENGTH {
        return Err(DeployError::InvalidRequest(format!(
            "symbol longer than {} bytes",
            MAX_SYMBOL_LENGTH
        )));
    }
    if request.total_supply == 0 {
        return Err(DeployError::InvalidRequest("total supply must be positive".into()));
    }
    mint_amount(request.total_supply, request.decimals)?;
    Ok(())
}
