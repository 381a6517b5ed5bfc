//! Series Book
//!
//! History for every (range, symbol) pair, plus wallet value series derived
//! from it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::generator::{generate_series_at, resolve_series};
use super::{Series, SeriesPoint};
use crate::market::{Range, Symbol};
use crate::model::{PriceMap, Wallet};

/// Timeline anchor when neither a valid BTC series nor a BTC price exists
const TIMELINE_FALLBACK_PRICE: Decimal = dec!(50000);

/// `series[range][symbol]`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesBook {
    series: BTreeMap<Range, BTreeMap<Symbol, Series>>,
}

impl SeriesBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate every range for `symbols`, each starting from its entry in
    /// `base_prices` (or the symbol's fallback start price) and ending at
    /// `end_ms`. Seeds are derived from the (symbol, range) tokens.
    pub fn generate(base_prices: &PriceMap, symbols: &[Symbol], end_ms: i64) -> Self {
        let mut book = Self::new();
        for range in Range::all() {
            for &symbol in symbols {
                let start = base_prices
                    .get(symbol)
                    .unwrap_or_else(|| symbol.fallback_start_price());
                book.insert(range, symbol, generate_series_at(symbol, range, start, None, end_ms));
            }
        }
        book
    }

    pub fn insert(&mut self, range: Range, symbol: Symbol, series: Series) -> Option<Series> {
        self.series.entry(range).or_default().insert(symbol, series)
    }

    pub fn get(&self, range: Range, symbol: Symbol) -> Option<&Series> {
        self.series.get(&range).and_then(|by_symbol| by_symbol.get(&symbol))
    }

    /// The stored series if it is valid for `range`, otherwise a generated
    /// one starting from `prices[symbol]` (or the fallback start price)
    pub fn resolve(&self, range: Range, symbol: Symbol, prices: &PriceMap, end_ms: i64) -> Series {
        let start = prices
            .get(symbol)
            .unwrap_or_else(|| symbol.fallback_start_price());
        resolve_series(self.get(range, symbol), symbol, range, start, end_ms)
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(BTreeMap::is_empty)
    }
}

/// Value of `wallet` over `range`.
///
/// BTC history provides the timeline. Each holding contributes
/// `quantity * price_at_i` from its own (resolved) series; holdings whose
/// series is shorter than the timeline contribute 0 past its end.
pub fn wallet_series(
    wallet: &Wallet,
    book: &SeriesBook,
    range: Range,
    prices: &PriceMap,
    end_ms: i64,
) -> Series {
    let timeline_start = prices.get(Symbol::Btc).unwrap_or(TIMELINE_FALLBACK_PRICE);
    let timeline = resolve_series(book.get(range, Symbol::Btc), Symbol::Btc, range, timeline_start, end_ms);

    let per_holding: Vec<(Decimal, Series)> = wallet
        .holdings
        .iter()
        .map(|h| (h.quantity, book.resolve(range, h.symbol, prices, end_ms)))
        .collect();

    timeline
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let total = per_holding
                .iter()
                .map(|(quantity, series)| *quantity * series.value_at(i).unwrap_or(Decimal::ZERO))
                .sum();
            SeriesPoint::new(point.timestamp_ms, total)
        })
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::is_valid_series;
    use rust_decimal_macros::dec;

    const END: i64 = 1_760_000_000_000;

    #[test]
    fn test_generate_fills_every_pair() {
        let book = SeriesBook::generate(&PriceMap::reference(), &Symbol::all(), END);
        for range in Range::all() {
            for symbol in Symbol::all() {
                let series = book.get(range, symbol).unwrap();
                assert_eq!(series.len(), range.config().points);
                assert!(is_valid_series(&series.points, range));
            }
        }
    }

    #[test]
    fn test_generate_uses_fallback_start_price() {
        let book = SeriesBook::generate(&PriceMap::new(), &[Symbol::Usdc], END);
        let first = book.get(Range::OneDay, Symbol::Usdc).unwrap().first().unwrap().value;
        assert!(first >= dec!(0.995) && first <= dec!(1.005));
        assert!(book.get(Range::OneDay, Symbol::Btc).is_none());
    }

    #[test]
    fn test_resolve_replaces_invalid_entry() {
        let mut book = SeriesBook::new();
        book.insert(Range::OneYear, Symbol::Eth, Series::new(vec![SeriesPoint::new(END, dec!(1))]));

        let prices = PriceMap::reference();
        let resolved = book.resolve(Range::OneYear, Symbol::Eth, &prices, END);
        assert_eq!(resolved.len(), 365);
        assert_eq!(
            resolved,
            generate_series_at(Symbol::Eth, Range::OneYear, dec!(3400), None, END)
        );
    }

    #[test]
    fn test_wallet_series_sums_holdings() {
        let prices = PriceMap::reference();
        let book = SeriesBook::generate(&prices, &Symbol::all(), END);
        let wallet = Wallet::new("w2", "Ledger")
            .with_holding(Symbol::Sol, dec!(85), dec!(55))
            .and_then(|w| w.with_holding(Symbol::Eth, dec!(1.9), dec!(3100)))
            .unwrap();

        let series = wallet_series(&wallet, &book, Range::OneWeek, &prices, END);
        let sol = book.get(Range::OneWeek, Symbol::Sol).unwrap();
        let eth = book.get(Range::OneWeek, Symbol::Eth).unwrap();

        assert_eq!(series.len(), 168);
        assert!(series.is_strictly_increasing());
        for (i, point) in series.points.iter().enumerate() {
            let expected = dec!(85) * sol.points[i].value + dec!(1.9) * eth.points[i].value;
            assert_eq!(point.value, expected);
        }
    }

    #[test]
    fn test_wallet_series_survives_empty_book() {
        let wallet = Wallet::new("w1", "Coinbase")
            .with_holding(Symbol::Usdc, dec!(2500), dec!(1))
            .unwrap();
        let series = wallet_series(&wallet, &SeriesBook::new(), Range::OneDay, &PriceMap::new(), END);

        assert_eq!(series.len(), 288);
        assert!(series.points.iter().all(|p| p.value > dec!(2400)));
    }

    #[test]
    fn test_empty_wallet_is_flat_zero() {
        let series = wallet_series(
            &Wallet::new("w0", "Empty"),
            &SeriesBook::new(),
            Range::OneMonth,
            &PriceMap::reference(),
            END,
        );
        assert_eq!(series.len(), 180);
        assert!(series.points.iter().all(|p| p.value.is_zero()));
    }
}
