//! Listing proxy client

use futures::future::join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::errors::ApiError;
use super::mapping::{map_coin, map_king_of_the_hill, merge_details};
use super::retry::{fetch_with_retry, RetryPolicy};
use crate::types::{CoinDetails, KingOfTheHill, PumpCoin, TrendingFeed};

/// Message shown when the listing fetch fails
pub const FEED_ERROR_MESSAGE: &str =
    "Unable to fetch trending coins. Please check your connection and try again.";

/// Fully-resolved listing filter
#[derive(Debug, Clone, PartialEq)]
pub struct CoinFilter {
    pub sort_by: String,
    pub market_cap_from: f64,
    pub volume_from: f64,
    pub num_holders_from: u64,
}

impl Default for CoinFilter {
    fn default() -> Self {
        Self {
            sort_by: "creationTime".to_string(),
            market_cap_from: 25_000.0,
            volume_from: 1.55,
            num_holders_from: 25,
        }
    }
}

/// Caller overrides; unset fields fall back to the client's defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialCoinFilter {
    pub sort_by: Option<String>,
    pub market_cap_from: Option<f64>,
    pub volume_from: Option<f64>,
    pub num_holders_from: Option<u64>,
}

impl PartialCoinFilter {
    pub fn resolve(&self, defaults: &CoinFilter) -> CoinFilter {
        CoinFilter {
            sort_by: self.sort_by.clone().unwrap_or_else(|| defaults.sort_by.clone()),
            market_cap_from: self.market_cap_from.unwrap_or(defaults.market_cap_from),
            volume_from: self.volume_from.unwrap_or(defaults.volume_from),
            num_holders_from: self.num_holders_from.unwrap_or(defaults.num_holders_from),
        }
    }
}

impl CoinFilter {
    fn query(&self) -> [(&'static str, String); 4] {
        [
            ("sortBy", self.sort_by.clone()),
            ("marketCapFrom", self.market_cap_from.to_string()),
            ("volumeFrom", self.volume_from.to_string()),
            ("numHoldersFrom", self.num_holders_from.to_string()),
        ]
    }
}

/// Client for the listing proxy
#[derive(Debug, Clone)]
pub struct PumpApiClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
    defaults: CoinFilter,
}

impl PumpApiClient {
    pub fn new(base_url: impl Into<String>, retry: RetryPolicy, defaults: CoinFilter) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_http(http, base_url, retry, defaults)
    }

    pub fn with_http(
        http: Client,
        base_url: impl Into<String>,
        retry: RetryPolicy,
        defaults: CoinFilter,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            retry,
            defaults,
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = fetch_with_retry(url, &self.retry, || self.http.get(url).query(query)).await?;
        response.json::<T>().await.map_err(|e| ApiError::decode(url, e))
    }

    /// List coins matching the filter, each merged with its detail payload
    ///
    /// A failure of the listing request propagates. A failure of any single
    /// detail request leaves that coin with its base fields only.
    pub async fn get_coins(&self, filter: &PartialCoinFilter) -> Result<Vec<PumpCoin>, ApiError> {
        let filter = filter.resolve(&self.defaults);
        let url = format!("{}/coins", self.base_url);
        let coins: Vec<PumpCoin> = self.get_json(&url, &filter.query()).await?;

        debug!(count = coins.len(), sort_by = %filter.sort_by, "Fetched coin listing");

        let merged = join_all(coins.into_iter().map(|coin| async move {
            match self.get_coin_details(&coin.coin_mint).await {
                Some(details) => merge_details(coin, details),
                None => coin,
            }
        }))
        .await;

        Ok(merged)
    }

    /// Fetch the detail payload for one coin; any failure yields `None`
    pub async fn get_coin_details(&self, mint: &str) -> Option<CoinDetails> {
        let url = format!("{}/coins/{}", self.base_url, mint);
        match self.get_json::<CoinDetails>(&url, &[]).await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!(mint, error = %e, "Failed to fetch coin details");
                None
            }
        }
    }

    /// Fetch the featured listing; any failure yields `None`
    pub async fn get_king_of_the_hill(&self) -> Option<KingOfTheHill> {
        let url = format!("{}/coins/king-of-the-hill", self.base_url);
        let query = [("includeNsfw", "false".to_string())];
        match self.get_json::<KingOfTheHill>(&url, &query).await {
            Ok(koth) => {
                debug!(mint = %koth.mint, name = %koth.name, "Fetched king of the hill");
                Some(koth)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch king of the hill, continuing without it");
                None
            }
        }
    }

    /// Refresh flow: featured entry, then listings minus the featured mint
    ///
    /// Never fails. A listing failure produces an empty feed carrying a
    /// user-visible error.
    pub async fn trending(&self, filter: &PartialCoinFilter) -> TrendingFeed {
        let koth = self.get_king_of_the_hill().await;

        let coins = match self.get_coins(filter).await {
            Ok(coins) => coins,
            Err(e) => {
                warn!(error = %e, category = e.category(), "Error fetching trending coins");
                return TrendingFeed {
                    king_of_the_hill: None,
                    coins: Vec::new(),
                    error: Some(FEED_ERROR_MESSAGE.to_string()),
                };
            }
        };

        let koth_mint = koth.as_ref().map(|k| k.mint.as_str()).filter(|m| !m.is_empty());
        let listings: Vec<_> = coins
            .iter()
            .filter(|coin| Some(coin.coin_mint.as_str()) != koth_mint)
            .map(|coin| map_coin(coin, false))
            .collect();

        info!(
            coins = listings.len(),
            king_of_the_hill = koth.is_some(),
            "Trending feed refreshed"
        );

        TrendingFeed {
            king_of_the_hill: koth.as_ref().map(map_king_of_the_hill),
            coins: listings,
            error: None,
        }
    }
}
