//! Instruction planning and ordering validation
//!
//! The local deploy is a fixed sequence where each step depends on state
//! established by the one before it:
//! 1. Compute budget (CU price, CU limit)
//! 2. Create mint account → initialize mint → create payer ATA → mint supply
//! 3. Attach metadata
//! 4. Revoke mint authority → revoke freeze authority
//! 5. Platform fee transfer
//!
//! Every instruction is tagged with its `DeployStep` so ordering can be
//! checked without decoding instruction data.

use solana_sdk::{compute_budget::ComputeBudgetInstruction, instruction::Instruction, pubkey::Pubkey};
#[allow(deprecated)]
use solana_sdk::system_instruction;
use spl_associated_token_account::instruction::create_associated_token_account;
use spl_token::instruction::{initialize_mint, mint_to, set_authority, AuthorityType};
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::Mint;

use super::config::DeployConfig;
use super::errors::DeployError;
use super::metadata::{create_metadata_accounts_v3, CreateMetadataArgs};

/// Largest supported decimal precision
pub const MAX_DECIMALS: u8 = 18;

/// What an instruction in a deploy plan does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeployStep {
    ComputeUnitPrice,
    ComputeUnitLimit,
    CreateMintAccount,
    InitializeMint,
    CreateTokenAccount,
    MintSupply,
    CreateMetadata,
    RevokeMintAuthority,
    RevokeFreezeAuthority,
    PlatformFee,
    /// Create instruction taken from the external trade API
    LaunchCreate,
    /// Bonding-curve buy for the dev wallet
    LaunchBuy,
}

/// Local deploy order, fixed
pub const LOCAL_DEPLOY_SEQUENCE: [DeployStep; 10] = [
    DeployStep::ComputeUnitPrice,
    DeployStep::ComputeUnitLimit,
    DeployStep::CreateMintAccount,
    DeployStep::InitializeMint,
    DeployStep::CreateTokenAccount,
    DeployStep::MintSupply,
    DeployStep::CreateMetadata,
    DeployStep::RevokeMintAuthority,
    DeployStep::RevokeFreezeAuthority,
    DeployStep::PlatformFee,
];

/// External-trade deploy order, fixed
pub const EXTERNAL_DEPLOY_SEQUENCE: [DeployStep; 5] = [
    DeployStep::ComputeUnitPrice,
    DeployStep::ComputeUnitLimit,
    DeployStep::LaunchCreate,
    DeployStep::CreateTokenAccount,
    DeployStep::LaunchBuy,
];

/// Ordered, append-only instruction list with a step tag per instruction
#[derive(Debug, Clone, Default)]
pub struct InstructionPlan {
    instructions: Vec<Instruction>,
    steps: Vec<DeployStep>,
}

impl InstructionPlan {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instructions: Vec::with_capacity(capacity),
            steps: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, step: DeployStep, ix: Instruction) {
        self.steps.push(step);
        self.instructions.push(ix);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn steps(&self) -> &[DeployStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// First instruction tagged with `step`
    pub fn find(&self, step: DeployStep) -> Option<&Instruction> {
        self.steps
            .iter()
            .position(|s| *s == step)
            .map(|idx| &self.instructions[idx])
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

/// Everything the local sequence needs besides configuration
#[derive(Debug, Clone)]
pub struct LocalDeployParams<'a> {
    pub payer: Pubkey,
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub rent_lamports: u64,
    pub decimals: u8,
    pub total_supply: u64,
    pub name: &'a str,
    pub symbol: &'a str,
    pub metadata_uri: &'a str,
}

/// `total_supply × 10^decimals` in exact integer arithmetic
///
/// Fails when the amount does not fit an SPL token amount (`u64`).
pub fn mint_amount(total_supply: u64, decimals: u8) -> Result<u64, DeployError> {
    if decimals > MAX_DECIMALS {
        return Err(DeployError::InvalidRequest(format!(
            "decimals must be <= {}, got {}",
            MAX_DECIMALS, decimals
        )));
    }

    let scaled = (total_supply as u128) * 10u128.pow(decimals as u32);
    u64::try_from(scaled).map_err(|_| {
        DeployError::InvalidRequest(format!(
            "total supply {} with {} decimals overflows a token amount",
            total_supply, decimals
        ))
    })
}

/// Compute budget prefix shared by both strategies
pub fn push_compute_budget(plan: &mut InstructionPlan, config: &DeployConfig) {
    plan.push(
        DeployStep::ComputeUnitPrice,
        ComputeBudgetInstruction::set_compute_unit_price(config.compute_unit_price),
    );
    plan.push(
        DeployStep::ComputeUnitLimit,
        ComputeBudgetInstruction::set_compute_unit_limit(config.compute_unit_limit),
    );
}

/// Plan the full local deploy sequence
pub fn plan_local_deploy(
    config: &DeployConfig,
    params: &LocalDeployParams<'_>,
) -> Result<InstructionPlan, DeployError> {
    let amount = mint_amount(params.total_supply, params.decimals)?;
    let token_program = spl_token::id();
    let payer = &params.payer;
    let mint = &params.mint;

    let mut plan = InstructionPlan::with_capacity(LOCAL_DEPLOY_SEQUENCE.len());
    push_compute_budget(&mut plan, config);

    #[allow(deprecated)]
    plan.push(
        DeployStep::CreateMintAccount,
        system_instruction::create_account(
            payer,
            mint,
            params.rent_lamports,
            Mint::LEN as u64,
            &token_program,
        ),
    );

    plan.push(
        DeployStep::InitializeMint,
        initialize_mint(&token_program, mint, payer, Some(payer), params.decimals)
            .map_err(|e| DeployError::instruction_failed("spl_token", e))?,
    );

    plan.push(
        DeployStep::CreateTokenAccount,
        create_associated_token_account(payer, payer, mint, &token_program),
    );

    plan.push(
        DeployStep::MintSupply,
        mint_to(&token_program, mint, &params.token_account, payer, &[], amount)
            .map_err(|e| DeployError::instruction_failed("spl_token", e))?,
    );

    plan.push(
        DeployStep::CreateMetadata,
        create_metadata_accounts_v3(
            &config.metadata_program,
            &CreateMetadataArgs {
                mint: *mint,
                mint_authority: *payer,
                payer: *payer,
                update_authority: *payer,
                name: params.name,
                symbol: params.symbol,
                uri: params.metadata_uri,
                creator: *payer,
                is_mutable: false,
            },
        )?,
    );

    plan.push(
        DeployStep::RevokeMintAuthority,
        set_authority(&token_program, mint, None, AuthorityType::MintTokens, payer, &[])
            .map_err(|e| DeployError::instruction_failed("spl_token", e))?,
    );

    plan.push(
        DeployStep::RevokeFreezeAuthority,
        set_authority(&token_program, mint, None, AuthorityType::FreezeAccount, payer, &[])
            .map_err(|e| DeployError::instruction_failed("spl_token", e))?,
    );

    #[allow(deprecated)]
    plan.push(
        DeployStep::PlatformFee,
        system_instruction::transfer(payer, &config.platform_fee_account, config.platform_fee_lamports),
    );

    Ok(plan)
}

/// Validate that a plan follows `expected` exactly
pub fn sanity_check_deploy_order(
    plan: &InstructionPlan,
    expected: &[DeployStep],
) -> Result<(), DeployError> {
    if plan.steps() == expected {
        return Ok(());
    }

    let mismatch = plan
        .steps()
        .iter()
        .zip(expected)
        .position(|(got, want)| got != want);

    let reason = match mismatch {
        Some(idx) => format!(
            "step {} is {:?}, expected {:?}",
            idx,
            plan.steps()[idx],
            expected[idx]
        ),
        None => format!(
            "plan has {} instructions, expected {}",
            plan.len(),
            expected.len()
        ),
    };
    Err(DeployError::Configuration(format!("invalid instruction order: {}", reason)))
}
