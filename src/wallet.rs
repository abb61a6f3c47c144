//! Wallet loading

use anyhow::{Context, Result};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::path::Path;
use std::sync::Arc;

/// Payer key pair loaded from disk
pub struct WalletManager {
    keypair: Arc<Keypair>,
}

impl WalletManager {
    /// Load a key pair file: 64 raw bytes, the JSON byte array written by
    /// `solana-keygen`, or a base58 secret as exported by browser wallets
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let keypair_bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read keypair file: {}", path.display()))?;

        let bytes = if keypair_bytes.len() == 64 {
            keypair_bytes
        } else {
            decode_keypair_text(&keypair_bytes)?
        };

        if bytes.iter().all(|&b| b == 0) {
            anyhow::bail!("Invalid keypair: all-zero key rejected");
        }
        let keypair = Keypair::try_from(bytes.as_slice()).context("Invalid keypair bytes")?;

        Ok(Self::from_keypair(keypair))
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

/// JSON byte array or base58 secret
fn decode_keypair_text(raw: &[u8]) -> Result<Vec<u8>> {
    let trimmed = raw.trim_ascii();
    let bytes: Vec<u8> = if trimmed.starts_with(b"[") {
        serde_json::from_slice(trimmed).context("Failed to parse keypair JSON")?
    } else {
        bs58::decode(trimmed)
            .into_vec()
            .context("Failed to decode base58 keypair")?
    };
    if bytes.len() != 64 {
        anyhow::bail!("Invalid keypair length: expected 64 bytes, got {}", bytes.len());
    }
    Ok(bytes)
}

impl Clone for WalletManager {
    fn clone(&self) -> Self {
        Self {
            keypair: Arc::clone(&self.keypair),
        }
    }
}
