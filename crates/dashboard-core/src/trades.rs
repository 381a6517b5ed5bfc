//! Trade History
//!
//! Seeded mock trades, padding of a short supplied history back to the full
//! window, and the filter/sort/page query the history table runs.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::market::{PRICE_FLOOR, Symbol, round_to};
use crate::rng::{Mulberry32, UniformSource};

/// Seed for the default generated history
pub const DEFAULT_TRADE_SEED: u32 = 42;

/// Seed for padding trades, distinct from the default history
pub const DEFAULT_PAD_SEED: u32 = 1337;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A single fill
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub symbol: Symbol,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee_usd: Decimal,
}

/// Shape of a generated history
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeHistoryParams {
    /// Window length, ending now
    pub days: u32,

    /// Trades to generate
    pub count: usize,

    pub seed: u32,
}

impl Default for TradeHistoryParams {
    fn default() -> Self {
        Self {
            days: 730,
            count: 900,
            seed: DEFAULT_TRADE_SEED,
        }
    }
}

impl TradeHistoryParams {
    /// `now - days`, clamped to the earliest representable instant
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(i64::from(self.days))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Generate `params.count` trades spread uniformly over the window ending at
/// `now`, newest first.
pub fn generate_trades(params: &TradeHistoryParams, now: DateTime<Utc>) -> Vec<Trade> {
    const SIDES: [TradeSide; 2] = [TradeSide::Buy, TradeSide::Sell];

    let symbols = Symbol::all();
    let mut rng = Mulberry32::new(params.seed);
    let start_ms = params.window_start(now).timestamp_millis();
    let window_ms = (now.timestamp_millis() - start_ms) as f64;

    let mut trades: Vec<Trade> = (0..params.count)
        .map(|idx| {
            let symbol = symbols[pick(&mut rng, symbols.len())];
            let side = SIDES[pick(&mut rng, SIDES.len())];
            let ts_ms = start_ms + (rng.next_unit() * window_ms) as i64;

            // Reference price +/- 7.5%
            let base = decimal_to_f64(symbol.reference_price());
            let noise = (rng.next_unit() - 0.5) * base * 0.15;
            let price = (base + noise).max(PRICE_FLOOR);

            let (span, min) = symbol.trade_size();
            let quantity = rng.next_unit() * span + min;

            // 0.15% .. 0.35% of notional
            let fee = price * quantity * rng.next_unit().mul_add(0.002, 0.0015);
            let tag = (rng.next_unit() * 1e9) as u64;

            Trade {
                id: format!("t_{idx}_{tag:x}"),
                timestamp: DateTime::<Utc>::from_timestamp_millis(ts_ms).unwrap_or(now),
                symbol,
                side,
                quantity: round_to(quantity, 4),
                price: symbol.round_price(price),
                fee_usd: round_to(fee, 2),
            }
        })
        .collect();

    sort_newest_first(&mut trades);
    trades
}

/// Extend `supplied` back to the start of the window.
///
/// - nothing supplied: the default generated history
/// - supplied history already reaches the window start: returned as is
/// - otherwise: generated trades (seeded with `pad_seed`) older than the
///   oldest supplied trade are merged in, skipping ids already present.
///   On equal timestamps supplied trades stay ahead of padding.
pub fn pad_history(
    supplied: Vec<Trade>,
    params: &TradeHistoryParams,
    pad_seed: u32,
    now: DateTime<Utc>,
) -> Vec<Trade> {
    let Some(oldest) = supplied.iter().map(|t| t.timestamp).min() else {
        return generate_trades(params, now);
    };
    if oldest <= params.window_start(now) {
        return supplied;
    }

    let seen: HashSet<String> = supplied.iter().map(|t| t.id.clone()).collect();
    let pad_params = TradeHistoryParams { seed: pad_seed, ..*params };
    let padding = generate_trades(&pad_params, now)
        .into_iter()
        .filter(|t| t.timestamp < oldest && !seen.contains(&t.id));

    let mut merged = supplied;
    merged.extend(padding);
    sort_newest_first(&mut merged);
    merged
}

fn sort_newest_first(trades: &mut [Trade]) {
    trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

fn pick(rng: &mut impl UniformSource, len: usize) -> usize {
    ((rng.next_unit() * len as f64) as usize).min(len - 1)
}

fn decimal_to_f64(value: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or(0.0)
}

/// Column to order the history table by
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSortKey {
    #[default]
    Timestamp,
    Symbol,
    Side,
    Quantity,
    Price,
    Fee,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// One page of query results
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePage {
    pub trades: Vec<Trade>,

    /// 1-based, clamped into `1..=total_pages`
    pub page: usize,

    pub total_pages: usize,

    /// Matches before paging
    pub total_matches: usize,
}

/// Filter, order and page a trade list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuery {
    /// Case-insensitive match against symbol, side or id
    pub text: String,

    /// `None` for both sides
    pub side: Option<TradeSide>,

    pub sort_key: TradeSortKey,
    pub direction: SortDirection,
    pub page_size: usize,
}

impl Default for TradeQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            side: None,
            sort_key: TradeSortKey::default(),
            direction: SortDirection::default(),
            page_size: 5,
        }
    }
}

impl TradeQuery {
    pub fn matches(&self, trade: &Trade) -> bool {
        let needle = self.text.trim().to_lowercase();
        let text_ok = needle.is_empty()
            || trade.symbol.as_ref().to_lowercase().contains(&needle)
            || trade.side.as_ref().to_lowercase().contains(&needle)
            || trade.id.to_lowercase().contains(&needle);
        let side_ok = self.side.is_none_or(|side| side == trade.side);
        text_ok && side_ok
    }

    fn compare(&self, a: &Trade, b: &Trade) -> Ordering {
        let ord = match self.sort_key {
            TradeSortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
            TradeSortKey::Symbol => a.symbol.as_ref().cmp(b.symbol.as_ref()),
            TradeSortKey::Side => a.side.as_ref().cmp(b.side.as_ref()),
            TradeSortKey::Quantity => a.quantity.cmp(&b.quantity),
            TradeSortKey::Price => a.price.cmp(&b.price),
            TradeSortKey::Fee => a.fee_usd.cmp(&b.fee_usd),
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    /// Run the query and return page `page` (1-based; out-of-range pages are
    /// clamped)
    pub fn page(&self, trades: &[Trade], page: usize) -> TradePage {
        let mut matched: Vec<&Trade> = trades.iter().filter(|t| self.matches(t)).collect();
        matched.sort_by(|a, b| self.compare(a, b));

        let page_size = self.page_size.max(1);
        let total_matches = matched.len();
        let total_pages = total_matches.div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);

        TradePage {
            trades: matched
                .into_iter()
                .skip((page - 1) * page_size)
                .take(page_size)
                .cloned()
                .collect(),
            page,
            total_pages,
            total_matches,
        }
    }
}
