//! Chain access used by the builder and deploy flow
//!
//! `ChainClient` is the seam between transaction assembly and the RPC node,
//! so builds can run against a fixture chain in tests.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::Mint;
use tracing::debug;

use super::errors::DeployError;

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_latest_blockhash(&self) -> Result<Hash, DeployError>;

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, DeployError>;

    /// Decimals of an existing mint
    async fn get_mint_decimals(&self, mint: &Pubkey) -> Result<u8, DeployError>;

    /// Submit a fully signed transaction and wait for confirmation
    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature, DeployError>;
}

/// Decode mint decimals from raw account data
///
/// Token-2022 mints carry extensions after the base layout, so only the
/// leading `Mint::LEN` bytes are read.
pub fn decode_mint_decimals(data: &[u8]) -> Result<u8, DeployError> {
    if data.len() < Mint::LEN {
        return Err(DeployError::PartialData(format!(
            "mint account too short: {} bytes",
            data.len()
        )));
    }
    let mint = Mint::unpack_from_slice(&data[..Mint::LEN])
        .map_err(|e| DeployError::PartialData(format!("mint account undecodable: {}", e)))?;
    if !mint.is_initialized {
        return Err(DeployError::PartialData("mint account not initialized".into()));
    }
    Ok(mint.decimals)
}

#[async_trait]
impl ChainClient for RpcClient {
    async fn get_latest_blockhash(&self) -> Result<Hash, DeployError> {
        RpcClient::get_latest_blockhash(self)
            .await
            .map_err(DeployError::rpc)
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, DeployError> {
        RpcClient::get_minimum_balance_for_rent_exemption(self, data_len)
            .await
            .map_err(DeployError::rpc)
    }

    async fn get_mint_decimals(&self, mint: &Pubkey) -> Result<u8, DeployError> {
        let data = self.get_account_data(mint).await.map_err(DeployError::rpc)?;
        debug!(mint = %mint, len = data.len(), "Fetched mint account");
        decode_mint_decimals(&data)
    }

    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature, DeployError> {
        self.send_and_confirm_transaction(tx).await.map_err(|e| {
            match e.get_transaction_error() {
                Some(tx_err) => DeployError::ChainRejected(tx_err.to_string()),
                None => DeployError::rpc(e),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_token::solana_program::program_option::COption;

    fn packed_mint(decimals: u8, initialized: bool) -> Vec<u8> {
        let mint = Mint {
            mint_authority: COption::None,
            supply: 1_000,
            decimals,
            is_initialized: initialized,
            freeze_authority: COption::None,
        };
        let mut data = vec![0u8; Mint::LEN];
        mint.pack_into_slice(&mut data);
        data
    }

    #[test]
    fn test_decode_decimals() {
        assert_eq!(decode_mint_decimals(&packed_mint(6, true)).unwrap(), 6);
    }

    #[test]
    fn test_decode_ignores_extension_tail() {
        let mut data = packed_mint(9, true);
        data.extend_from_slice(&[0u8; 100]);
        assert_eq!(decode_mint_decimals(&data).unwrap(), 9);
    }

    #[test]
    fn test_decode_rejects_bad_accounts() {
        assert!(matches!(decode_mint_decimals(&[0u8; 10]), Err(DeployError::PartialData(_))));
        assert!(matches!(
            decode_mint_decimals(&packed_mint(6, false)),
            Err(DeployError::PartialData(_))
        ));
    }
}
