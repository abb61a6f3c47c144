//! Common types used throughout the application
//!
//! Raw payloads from the listing proxy (`PumpCoin`, `CoinDetails`,
//! `KingOfTheHill`) mirror the upstream JSON field names. `CoinListing` is
//! the display model rebuilt on every refresh.

use serde::{Deserialize, Serialize};

/// A single holder entry attached to a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PumpHolder {
    pub holder_id: String,
    pub owned_percentage: f64,
    pub realized_pn_l: f64,
    pub total_cost_of_tokens_held: f64,
    pub total_token_amount_held: f64,
    pub is_sniper: bool,
    pub unrealized_pn_l: f64,
}

/// Raw listing payload from `GET /coins`
///
/// The snake_case fields are merged in from the per-coin detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PumpCoin {
    pub coin_mint: String,
    #[serde(default)]
    pub dev: String,
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub image_url: String,
    /// Creation time in milliseconds since the epoch
    #[serde(default)]
    pub creation_time: i64,
    #[serde(default)]
    pub num_holders: u64,
    #[serde(default)]
    pub market_cap: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub bonding_curve_progress: f64,
    #[serde(default)]
    pub sniper_count: u64,
    #[serde(default)]
    pub current_market_price: f64,
    #[serde(default)]
    pub holders: Vec<PumpHolder>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "usd_market_cap", default, skip_serializing_if = "Option::is_none")]
    pub usd_market_cap: Option<f64>,
    #[serde(rename = "last_reply", default, skip_serializing_if = "Option::is_none")]
    pub last_reply: Option<i64>,
    #[serde(rename = "raydium_pool", default, skip_serializing_if = "Option::is_none")]
    pub raydium_pool: Option<String>,
    #[serde(rename = "is_currently_live", default, skip_serializing_if = "Option::is_none")]
    pub is_currently_live: Option<bool>,
}

/// Raw per-coin detail payload from `GET /coins/{mint}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinDetails {
    pub mint: Option<String>,
    pub description: Option<String>,
    pub image_uri: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
    pub usd_market_cap: Option<f64>,
    pub last_reply: Option<i64>,
    pub raydium_pool: Option<String>,
    pub is_currently_live: Option<bool>,
}

/// Featured listing payload from `GET /coins/king-of-the-hill`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KingOfTheHill {
    pub mint: String,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image_uri: String,
    pub video_uri: Option<String>,
    pub metadata_uri: String,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
    pub bonding_curve: String,
    pub associated_bonding_curve: String,
    pub creator: String,
    pub created_timestamp: i64,
    pub raydium_pool: Option<String>,
    pub complete: bool,
    /// Lamports
    pub virtual_sol_reserves: u64,
    pub virtual_token_reserves: u64,
    pub total_supply: u64,
    pub show_name: bool,
    pub king_of_the_hill_timestamp: i64,
    pub market_cap: f64,
    pub reply_count: u64,
    pub last_reply: Option<i64>,
    pub nsfw: bool,
    pub is_currently_live: bool,
    pub usd_market_cap: f64,
}

/// Social links shown alongside a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
    pub pumpfun: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Display-oriented listing, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinListing {
    /// Mint address
    pub id: String,
    pub title: String,
    pub ticker: String,
    /// Formatted as `$1,234,567`
    pub market_cap: String,
    pub volume: f64,
    /// Holder count for listings, reply count for the featured entry
    pub replies: u64,
    /// RFC3339 timestamp of the last trade or reply
    pub last_trade: String,
    pub image_url: String,
    /// Bonding-curve progress in percent
    pub progress: f64,
    pub snipers: u64,
    pub dev: String,
    pub description: Option<String>,
    pub is_king_of_hill: bool,
    pub is_live: Option<bool>,
    pub socials: Socials,
}

/// Everything the UI refresh needs
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendingFeed {
    pub king_of_the_hill: Option<CoinListing>,
    pub coins: Vec<CoinListing>,
    /// User-visible error when the listing fetch failed
    pub error: Option<String>,
}

/// User-supplied token parameters for a deploy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreationRequest {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub decimals: u8,
    /// Whole tokens, scaled by `10^decimals` when minted
    pub total_supply: u64,
    pub image_url: Option<String>,
    pub website_url: Option<String>,
    pub twitter_url: Option<String>,
    pub telegram_url: Option<String>,
}

impl TokenCreationRequest {
    /// Build the copy request for a discovered coin
    pub fn from_listing(listing: &CoinListing, decimals: u8, total_supply: u64) -> Self {
        let image_url = Some(listing.image_url.clone()).filter(|url| !url.is_empty());
        Self {
            name: listing.title.clone(),
            symbol: listing.ticker.clone(),
            description: listing.description.clone().unwrap_or_default(),
            decimals,
            total_supply,
            image_url,
            website_url: listing.socials.website.clone(),
            twitter_url: listing.socials.twitter.clone(),
            telegram_url: listing.socials.telegram.clone(),
        }
    }
}

/// Off-chain metadata document uploaded before the metadata instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    pub name: String,
    pub symbol: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub show_name: bool,
    pub created_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub tags: Vec<String>,
}

/// Provenance tag written into every metadata document
pub const METADATA_CREATED_ON: &str = "https://pump.fun";

impl MetadataDocument {
    pub fn from_request(request: &TokenCreationRequest) -> Self {
        Self {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            description: request.description.clone(),
            image: request.image_url.clone(),
            show_name: true,
            created_on: METADATA_CREATED_ON.to_string(),
            twitter: request.twitter_url.clone(),
            telegram: request.telegram_url.clone(),
            website: request.website_url.clone(),
            tags: vec!["meme".to_string()],
        }
    }
}
