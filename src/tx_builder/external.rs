//! Trade-construction API client
//!
//! The API returns a serialized `VersionedTransaction`. Only the launch
//! program's create instruction is kept from it; everything else in the
//! blob is discarded and rebuilt locally.

use serde::Serialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, transaction::VersionedTransaction};
use tracing::{debug, warn};

use super::config::TradeApiConfig;
use super::errors::DeployError;
use crate::compat::{find_program_instruction, get_compiled_instructions};

const SERVICE: &str = "trade-api";

#[derive(Debug, Serialize)]
pub struct TokenMetadataFields<'a> {
    pub name: &'a str,
    pub symbol: &'a str,
    pub uri: &'a str,
}

/// JSON body of a `create` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTradeRequest<'a> {
    pub public_key: String,
    pub action: &'static str,
    pub token_metadata: TokenMetadataFields<'a>,
    pub mint: String,
    /// Sent as a string, the API rejects a bool here
    pub denominated_in_sol: &'static str,
    pub amount: u64,
    pub slippage: u32,
    pub priority_fee: f64,
    pub pool: &'a str,
}

impl<'a> CreateTradeRequest<'a> {
    pub fn new(
        config: &'a TradeApiConfig,
        payer: &Pubkey,
        mint: &Pubkey,
        metadata: TokenMetadataFields<'a>,
    ) -> Self {
        Self {
            public_key: payer.to_string(),
            action: "create",
            token_metadata: metadata,
            mint: mint.to_string(),
            denominated_in_sol: "false",
            amount: config.create_amount,
            slippage: config.slippage_percent,
            priority_fee: config.priority_fee_sol,
            pool: &config.pool,
        }
    }
}

/// POST the create request and return the raw transaction bytes
pub async fn request_create_transaction(
    http: &reqwest::Client,
    url: &str,
    request: &CreateTradeRequest<'_>,
) -> Result<Vec<u8>, DeployError> {
    let response = http
        .post(url)
        .json(request)
        .send()
        .await
        .map_err(|e| DeployError::network(SERVICE, e))?;

    let status = response.status();
    if !status.is_success() {
        warn!(url = %url, status = status.as_u16(), "Trade API rejected create request");
        return Err(DeployError::ExternalTrade {
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| DeployError::network(SERVICE, e))?;
    debug!(len = bytes.len(), "Received create transaction");
    Ok(bytes.to_vec())
}

/// Decode the blob and pull out the first instruction for `program_id`
pub fn extract_create_instruction(bytes: &[u8], program_id: &Pubkey) -> Result<Instruction, DeployError> {
    let tx: VersionedTransaction =
        bincode::deserialize(bytes).map_err(|e| DeployError::invalid_response(SERVICE, e))?;

    debug!(
        instructions = get_compiled_instructions(&tx.message).len(),
        "Decoded external transaction"
    );

    match find_program_instruction(&tx.message, program_id) {
        Ok(Some(ix)) => Ok(ix),
        Ok(None) => Err(DeployError::MissingCreateInstruction {
            program: program_id.to_string(),
        }),
        Err(e) => Err(DeployError::invalid_response(SERVICE, e)),
    }
}
