//! Raw payload → display model mapping

use chrono::{TimeZone, Utc};

use crate::types::{CoinDetails, CoinListing, KingOfTheHill, PumpCoin, Socials};

const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Link to the coin's page on the launch platform
pub fn pumpfun_url(mint: &str) -> String {
    format!("https://pump.fun/coin/{}", mint)
}

/// Merge per-coin detail fields over the listing fields
///
/// Detail values win when present. The image only switches to the detail
/// source when the detail image is non-empty.
pub fn merge_details(mut coin: PumpCoin, details: CoinDetails) -> PumpCoin {
    if details.description.is_some() {
        coin.description = details.description;
    }
    if details.twitter.is_some() {
        coin.twitter = details.twitter;
    }
    if details.telegram.is_some() {
        coin.telegram = details.telegram;
    }
    if details.website.is_some() {
        coin.website = details.website;
    }
    if details.usd_market_cap.is_some() {
        coin.usd_market_cap = details.usd_market_cap;
    }
    if details.last_reply.is_some() {
        coin.last_reply = details.last_reply;
    }
    if details.raydium_pool.is_some() {
        coin.raydium_pool = details.raydium_pool;
    }
    if details.is_currently_live.is_some() {
        coin.is_currently_live = details.is_currently_live;
    }
    if let Some(image) = details.image_uri.filter(|uri| !uri.is_empty()) {
        coin.image_url = image;
    }
    coin
}

/// Map a (possibly merged) listing into its display model
pub fn map_coin(coin: &PumpCoin, is_king_of_hill: bool) -> CoinListing {
    let market_cap = coin.usd_market_cap.unwrap_or(coin.market_cap);
    let last_trade = coin.last_reply.unwrap_or(coin.creation_time);

    CoinListing {
        id: coin.coin_mint.clone(),
        title: coin.name.clone(),
        ticker: coin.ticker.clone(),
        market_cap: format_usd(market_cap),
        volume: coin.volume,
        replies: coin.num_holders,
        last_trade: format_timestamp_ms(last_trade),
        image_url: coin.image_url.clone(),
        progress: coin.bonding_curve_progress,
        snipers: coin.sniper_count,
        dev: coin.dev.clone(),
        description: coin.description.clone(),
        is_king_of_hill,
        is_live: coin.is_currently_live,
        socials: Socials {
            pumpfun: pumpfun_url(&coin.coin_mint),
            twitter: non_empty(coin.twitter.as_deref()),
            telegram: non_empty(coin.telegram.as_deref()),
            website: non_empty(coin.website.as_deref()),
        },
    }
}

/// Map the featured entry; it is always shown as a completed curve
pub fn map_king_of_the_hill(koth: &KingOfTheHill) -> CoinListing {
    let last_trade = koth.last_reply.unwrap_or(koth.king_of_the_hill_timestamp);

    CoinListing {
        id: koth.mint.clone(),
        title: koth.name.clone(),
        ticker: koth.symbol.clone(),
        market_cap: format_usd(koth.usd_market_cap),
        volume: koth.virtual_sol_reserves as f64 / LAMPORTS_PER_SOL,
        replies: koth.reply_count,
        last_trade: format_timestamp_ms(last_trade),
        image_url: koth.image_uri.clone(),
        progress: 100.0,
        snipers: 0,
        dev: koth.creator.clone(),
        description: Some(koth.description.clone()),
        is_king_of_hill: true,
        is_live: Some(koth.is_currently_live),
        socials: Socials {
            pumpfun: pumpfun_url(&koth.mint),
            twitter: non_empty(koth.twitter.as_deref()),
            telegram: non_empty(koth.telegram.as_deref()),
            website: non_empty(koth.website.as_deref()),
        },
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// `$` prefix, thousands separators, at most three fraction digits
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }

    let negative = value < 0.0;
    let rounded = (value.abs() * 1000.0).round() as u128;
    let whole = rounded / 1000;
    let fraction = rounded % 1000;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::from(if negative { "-$" } else { "$" });
    out.push_str(&grouped);
    if fraction > 0 {
        let frac = format!("{:03}", fraction);
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

/// Millisecond epoch → RFC3339; out-of-range values render as the epoch
pub fn format_timestamp_ms(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or_default()
        .to_rfc3339()
}
