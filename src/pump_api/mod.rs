//! Listing proxy client
//!
//! - **retry**: fetch with a fixed retry budget and delay
//! - **client**: listing, detail and king-of-the-hill reads plus the refresh flow
//! - **mapping**: raw payloads → `CoinListing`
//! - **errors**: `ApiError`

pub mod client;
pub mod errors;
pub mod mapping;
pub mod retry;

pub use client::{CoinFilter, PartialCoinFilter, PumpApiClient, FEED_ERROR_MESSAGE};
pub use errors::ApiError;
pub use retry::{fetch_with_retry, RetryPolicy, MAX_RETRIES, RETRY_DELAY};
