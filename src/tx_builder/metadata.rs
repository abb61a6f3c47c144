//! Token Metadata `CreateMetadataAccountV3` instruction
//!
//! Args mirror the program's borsh layout so the builder does not pull a
//! second Solana SDK through the Metaplex client crate.

use borsh::BorshSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

use super::errors::DeployError;

/// Instruction discriminator of `CreateMetadataAccountV3`
const CREATE_METADATA_ACCOUNT_V3: u8 = 33;

/// Metadata program limits
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;

/// Metadata account PDA for `mint`: `["metadata", program, mint]`
pub fn metadata_pda(metadata_program: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[b"metadata", metadata_program.as_ref(), mint.as_ref()],
        metadata_program,
    )
    .0
}

#[derive(Debug, Clone)]
pub struct CreateMetadataArgs<'a> {
    pub mint: Pubkey,
    pub mint_authority: Pubkey,
    pub payer: Pubkey,
    pub update_authority: Pubkey,
    pub name: &'a str,
    pub symbol: &'a str,
    pub uri: &'a str,
    /// Sole creator, verified, 100% share
    pub creator: Pubkey,
    pub is_mutable: bool,
}

#[derive(BorshSerialize)]
struct Creator {
    address: [u8; 32],
    verified: bool,
    share: u8,
}

#[derive(BorshSerialize)]
struct DataV2 {
    name: String,
    symbol: String,
    uri: String,
    seller_fee_basis_points: u16,
    creators: Option<Vec<Creator>>,
    // collection and uses are never set
    collection: Option<()>,
    uses: Option<()>,
}

#[derive(BorshSerialize)]
struct CreateMetadataAccountArgsV3 {
    data: DataV2,
    is_mutable: bool,
    collection_details: Option<()>,
}

/// Discriminator followed by the borsh-encoded args
pub(crate) fn encode_create_metadata_v3(args: &CreateMetadataArgs<'_>) -> Result<Vec<u8>, DeployError> {
    let body = CreateMetadataAccountArgsV3 {
        data: DataV2 {
            name: args.name.to_string(),
            symbol: args.symbol.to_string(),
            uri: args.uri.to_string(),
            seller_fee_basis_points: 0,
            creators: Some(vec![Creator {
                address: args.creator.to_bytes(),
                verified: true,
                share: 100,
            }]),
            collection: None,
            uses: None,
        },
        is_mutable: args.is_mutable,
        collection_details: None,
    };

    let mut data = vec![CREATE_METADATA_ACCOUNT_V3];
    data.extend(borsh::to_vec(&body).map_err(|e| DeployError::instruction_failed("token_metadata", e))?);
    Ok(data)
}

/// Build `CreateMetadataAccountV3` for `args.mint`
pub fn create_metadata_accounts_v3(
    metadata_program: &Pubkey,
    args: &CreateMetadataArgs<'_>,
) -> Result<Instruction, DeployError> {
    let metadata = metadata_pda(metadata_program, &args.mint);
    let update_authority_signs = args.update_authority == args.payer
        || args.update_authority == args.mint_authority;

    Ok(Instruction {
        program_id: *metadata_program,
        accounts: vec![
            AccountMeta::new(metadata, false),
            AccountMeta::new_readonly(args.mint, false),
            AccountMeta::new_readonly(args.mint_authority, true),
            AccountMeta::new(args.payer, true),
            AccountMeta::new_readonly(args.update_authority, update_authority_signs),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: encode_create_metadata_v3(args)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx_builder::config::METADATA_PROGRAM_ID;

    fn args(payer: Pubkey, mint: Pubkey) -> CreateMetadataArgs<'static> {
        CreateMetadataArgs {
            mint,
            mint_authority: payer,
            payer,
            update_authority: payer,
            name: "Test",
            symbol: "TST",
            uri: "https://arweave.net/abc",
            creator: payer,
            is_mutable: false,
        }
    }

    #[test]
    fn test_encoding_layout() {
        let payer = Pubkey::new_unique();
        let data = encode_create_metadata_v3(&args(payer, Pubkey::new_unique())).unwrap();

        assert_eq!(data[0], 33);
        assert_eq!(&data[1..5], &4u32.to_le_bytes());
        assert_eq!(&data[5..9], b"Test");
        assert_eq!(&data[9..13], &3u32.to_le_bytes());
        assert_eq!(&data[13..16], b"TST");

        let uri_end = 16 + 4 + "https://arweave.net/abc".len();
        assert_eq!(&data[16..20], &23u32.to_le_bytes());
        // seller fee, Some(creators), len 1
        assert_eq!(&data[uri_end..uri_end + 2], &[0, 0]);
        assert_eq!(data[uri_end + 2], 1);
        assert_eq!(&data[uri_end + 3..uri_end + 7], &1u32.to_le_bytes());
        assert_eq!(&data[uri_end + 7..uri_end + 39], payer.as_ref());
        assert_eq!(&data[uri_end + 39..], &[1, 100, 0, 0, 0, 0]);
    }

    #[test]
    fn test_mutable_flag_encoded() {
        let payer = Pubkey::new_unique();
        let mut mutable = args(payer, Pubkey::new_unique());
        mutable.is_mutable = true;

        let data = encode_create_metadata_v3(&mutable).unwrap();
        assert_eq!(&data[data.len() - 2..], &[1, 0]);
    }

    #[test]
    fn test_accounts() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ix = create_metadata_accounts_v3(&METADATA_PROGRAM_ID, &args(payer, mint)).unwrap();

        assert_eq!(ix.program_id, METADATA_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), 6);
        assert_eq!(ix.accounts[0].pubkey, metadata_pda(&METADATA_PROGRAM_ID, &mint));
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, mint);
        assert!(ix.accounts[3].is_signer && ix.accounts[3].is_writable);
        assert!(ix.accounts[4].is_signer);
    }

    #[test]
    fn test_pda_is_deterministic() {
        let mint = Pubkey::new_unique();
        assert_eq!(
            metadata_pda(&METADATA_PROGRAM_ID, &mint),
            metadata_pda(&METADATA_PROGRAM_ID, &mint)
        );
        assert_ne!(
            metadata_pda(&METADATA_PROGRAM_ID, &mint),
            metadata_pda(&METADATA_PROGRAM_ID, &Pubkey::new_unique())
        );
    }
}
