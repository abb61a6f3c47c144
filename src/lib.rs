//! copymeme - trending meme-coin discovery and copy-deploy
//!
//! This library exposes the listing client, the deploy transaction builder
//! and the copy flow that ties them together.

pub mod compat;
pub mod config;
pub mod deploy;
pub mod pump_api;
pub mod structured_logging;
pub mod tx_builder;
pub mod types;
pub mod wallet;

// Re-export commonly used types
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
