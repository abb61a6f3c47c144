//! Bonding-curve launch program instructions

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    system_program, sysvar,
};
use spl_associated_token_account::get_associated_token_address;

use super::config::LaunchProgramConfig;
use super::errors::DeployError;
use super::instructions::mint_amount;

/// Anchor discriminator: first 8 bytes of `sha256("global:<name>")`
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(format!("global:{}", name).as_bytes());
    let hash = hasher.finalize();

    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

/// Bonding curve PDA for `mint`: `["bonding-curve", mint]`
pub fn bonding_curve_pda(program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[b"bonding-curve", mint.as_ref()], program_id).0
}

#[derive(BorshSerialize)]
struct BuyArgs {
    amount: u64,
    max_sol_cost: u64,
}

/// Dev-wallet buy sizing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuyParams {
    /// Whole tokens to buy
    pub tokens: u64,
    /// Decimals the launch program mints with
    pub decimals: u8,
    /// Upper bound on SOL spent
    pub max_sol_cost: f64,
}

impl BuyParams {
    pub fn raw_amount(&self) -> Result<u64, DeployError> {
        mint_amount(self.tokens, self.decimals)
    }

    pub fn max_lamports(&self) -> Result<u64, DeployError> {
        if !self.max_sol_cost.is_finite() || self.max_sol_cost < 0.0 {
            return Err(DeployError::InvalidRequest(format!(
                "max sol cost must be a non-negative number, got {}",
                self.max_sol_cost
            )));
        }
        let lamports = (self.max_sol_cost * LAMPORTS_PER_SOL as f64).round();
        if lamports > u64::MAX as f64 {
            return Err(DeployError::InvalidRequest("max sol cost overflows lamports".into()));
        }
        Ok(lamports as u64)
    }
}

/// Build the launch program `buy` instruction for `user`
pub fn buy_instruction(
    program: &LaunchProgramConfig,
    user: &Pubkey,
    mint: &Pubkey,
    params: &BuyParams,
) -> Result<Instruction, DeployError> {
    let bonding_curve = bonding_curve_pda(&program.program_id, mint);
    let bonding_curve_ata = get_associated_token_address(&bonding_curve, mint);
    let user_ata = get_associated_token_address(user, mint);

    let args = BuyArgs {
        amount: params.raw_amount()?,
        max_sol_cost: params.max_lamports()?,
    };
    let mut data = anchor_discriminator("buy").to_vec();
    data.extend(borsh::to_vec(&args).map_err(|e| DeployError::instruction_failed("launch", e))?);

    Ok(Instruction {
        program_id: program.program_id,
        accounts: vec![
            AccountMeta::new_readonly(program.global, false),
            AccountMeta::new(program.fee_recipient, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(bonding_curve, false),
            AccountMeta::new(bonding_curve_ata, false),
            AccountMeta::new(user_ata, false),
            AccountMeta::new(*user, true),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(program.event_authority, false),
            AccountMeta::new_readonly(program.program_id, false),
        ],
        data,
    })
}
