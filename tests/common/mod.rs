//! Shared fixtures for integration tests
//!
//! Deterministic stand-ins for the chain and metadata storage so builds can
//! run without network access.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use copymeme::tx_builder::{ChainClient, DeployError, MetadataUploader};
use copymeme::types::{CoinListing, MetadataDocument, Socials, TokenCreationRequest};
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use tokio::sync::Mutex;

pub const MOCK_RENT: u64 = 1_461_600;
pub const MOCK_URI: &str = "https://arweave.net/mock-metadata";

/// Mock chain with programmable mint decimals and submit outcome
#[derive(Clone)]
pub struct MockChain {
    pub blockhash: Hash,
    pub decimals: Arc<Mutex<HashMap<Pubkey, u8>>>,
    pub reject_with: Option<String>,
    pub submitted: Arc<Mutex<Vec<Transaction>>>,
    pub blockhash_calls: Arc<Mutex<usize>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_from_array([7u8; 32]),
            decimals: Arc::new(Mutex::new(HashMap::new())),
            reject_with: None,
            submitted: Arc::new(Mutex::new(Vec::new())),
            blockhash_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Chain that rejects every submitted transaction
    pub fn new_rejecting(reason: &str) -> Self {
        let mut chain = Self::new();
        chain.reject_with = Some(reason.to_string());
        chain
    }

    pub async fn with_mint(self, mint: Pubkey, decimals: u8) -> Self {
        self.decimals.lock().await.insert(mint, decimals);
        self
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_latest_blockhash(&self) -> Result<Hash, DeployError> {
        *self.blockhash_calls.lock().await += 1;
        Ok(self.blockhash)
    }

    async fn get_minimum_balance_for_rent_exemption(&self, _data_len: usize) -> Result<u64, DeployError> {
        Ok(MOCK_RENT)
    }

    async fn get_mint_decimals(&self, mint: &Pubkey) -> Result<u8, DeployError> {
        self.decimals
            .lock()
            .await
            .get(mint)
            .copied()
            .ok_or_else(|| DeployError::Rpc(format!("account {} not found", mint)))
    }

    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature, DeployError> {
        if let Some(reason) = &self.reject_with {
            return Err(DeployError::ChainRejected(reason.clone()));
        }
        self.submitted.lock().await.push(tx.clone());
        Ok(tx.signatures[0])
    }
}

/// Mock uploader recording every document it receives
#[derive(Clone)]
pub struct MockUploader {
    pub uri: Option<String>,
    pub uploads: Arc<Mutex<Vec<MetadataDocument>>>,
}

impl MockUploader {
    pub fn new() -> Self {
        Self {
            uri: Some(MOCK_URI.to_string()),
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Uploader whose storage is unavailable
    pub fn new_failing() -> Self {
        Self {
            uri: None,
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Uploader that succeeds with an empty URI
    pub fn new_empty() -> Self {
        Self {
            uri: Some(String::new()),
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl MetadataUploader for MockUploader {
    async fn upload_json(&self, doc: &MetadataDocument) -> Result<String, DeployError> {
        self.uploads.lock().await.push(doc.clone());
        self.uri
            .clone()
            .ok_or_else(|| DeployError::upload_transient("storage unavailable"))
    }
}

pub fn test_request() -> TokenCreationRequest {
    TokenCreationRequest {
        name: "Test".into(),
        symbol: "TST".into(),
        description: "a test token".into(),
        decimals: 6,
        total_supply: 1000,
        image_url: Some("https://img.example/test.png".into()),
        website_url: Some("https://test.example".into()),
        twitter_url: None,
        telegram_url: None,
    }
}

pub fn test_listing(mint: &Pubkey) -> CoinListing {
    CoinListing {
        id: mint.to_string(),
        title: "Doge Copy".into(),
        ticker: "DOGEC".into(),
        market_cap: "$30,000".into(),
        volume: 2.5,
        replies: 12,
        last_trade: "2024-01-01T00:00:00+00:00".into(),
        image_url: "https://img.example/doge.png".into(),
        progress: 40.0,
        snipers: 0,
        dev: "dev".into(),
        description: Some("much copy".into()),
        is_king_of_hill: false,
        is_live: None,
        socials: Socials {
            pumpfun: format!("https://pump.fun/coin/{}", mint),
            twitter: Some("https://x.com/doge".into()),
            telegram: None,
            website: None,
        },
    }
}
