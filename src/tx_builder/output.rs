//! Build output: unsigned transaction plus the generated mint key pair
//!
//! The mint key pair exists only here. Callers must co-sign with it before
//! submission, since the mint account is created inside the transaction.

use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};

use super::errors::DeployError;
use super::instructions::{DeployStep, InstructionPlan};

/// Unsigned deploy transaction
pub struct BuiltTransaction {
    transaction: Transaction,
    instructions: Vec<Instruction>,
    steps: Vec<DeployStep>,
    mint_keypair: Keypair,
    token_account: Pubkey,
}

impl BuiltTransaction {
    pub(crate) fn new(
        transaction: Transaction,
        plan: InstructionPlan,
        mint_keypair: Keypair,
        token_account: Pubkey,
    ) -> Self {
        let steps = plan.steps().to_vec();
        Self {
            transaction,
            instructions: plan.into_instructions(),
            steps,
            mint_keypair,
            token_account,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Instructions in submission order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Step tag for each instruction
    pub fn steps(&self) -> &[DeployStep] {
        &self.steps
    }

    pub fn mint(&self) -> Pubkey {
        self.mint_keypair.pubkey()
    }

    pub fn mint_keypair(&self) -> &Keypair {
        &self.mint_keypair
    }

    /// Payer's associated token account for the new mint
    pub fn token_account(&self) -> Pubkey {
        self.token_account
    }

    pub fn recent_blockhash(&self) -> Hash {
        self.transaction.message.recent_blockhash
    }

    /// Sign with the mint key pair and `payer` against `blockhash`
    pub fn sign(&mut self, payer: &Keypair, blockhash: Hash) -> Result<(), DeployError> {
        self.transaction
            .try_sign(&[payer, &self.mint_keypair], blockhash)
            .map_err(|e| DeployError::Signing(e.to_string()))
    }

    pub fn into_parts(self) -> (Transaction, Keypair, Pubkey) {
        (self.transaction, self.mint_keypair, self.token_account)
    }
}

impl std::fmt::Debug for BuiltTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltTransaction")
            .field("mint", &self.mint())
            .field("token_account", &self.token_account)
            .field("steps", &self.steps)
            .finish()
    }
}
