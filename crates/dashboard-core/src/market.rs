//! Market Catalogue
//!
//! The closed set of assets and display ranges the engine knows about.
//! Every per-asset and per-range constant is a total `match`, so adding a
//! variant forces every table to be filled in.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

use crate::error::{EngineError, Result};

/// Lower edge of the band the stable coin is held in.
pub const STABLE_BAND_LOW: f64 = 0.995;

/// Upper edge of the band the stable coin is held in.
pub const STABLE_BAND_HIGH: f64 = 1.005;

/// Smallest price a volatile asset may fall to.
pub const PRICE_FLOOR: f64 = 0.01;

/// A supported asset
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Symbol {
    Btc,
    Eth,
    Sol,
    Usdc,
}

impl Symbol {
    /// Full asset name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Btc => "Bitcoin",
            Self::Eth => "Ethereum",
            Self::Sol => "Solana",
            Self::Usdc => "USD Coin",
        }
    }

    /// Accent colour used by chart and allocation consumers
    pub const fn color(self) -> &'static str {
        match self {
            Self::Btc => "#F7931A",
            Self::Eth => "#627EEA",
            Self::Sol => "#14F195",
            Self::Usdc => "#2775CA",
        }
    }

    pub const fn is_stable(self) -> bool {
        matches!(self, Self::Usdc)
    }

    /// Decimal places used when emitting prices
    pub const fn precision(self) -> u32 {
        if self.is_stable() { 4 } else { 2 }
    }

    /// Per-step volatility of generated history before range scaling
    pub const fn series_volatility(self) -> f64 {
        match self {
            Self::Btc => 0.016,
            Self::Eth => 0.018,
            Self::Sol => 0.03,
            Self::Usdc => 0.0005,
        }
    }

    /// Per-tick volatility of the live ticker
    pub const fn ticker_volatility(self) -> f64 {
        match self {
            Self::Btc => 0.008,
            Self::Eth => 0.009,
            Self::Sol => 0.012,
            Self::Usdc => 0.0002,
        }
    }

    /// Reference USD price, used as the ticker's opening price and as the
    /// centre of generated trade prices
    pub fn reference_price(self) -> Decimal {
        match self {
            Self::Btc => dec!(63000),
            Self::Eth => dec!(3400),
            Self::Sol => dec!(82),
            Self::Usdc => dec!(1),
        }
    }

    /// Start price for generated history when no base price is supplied
    pub fn fallback_start_price(self) -> Decimal {
        if self.is_stable() { Decimal::ONE } else { dec!(100) }
    }

    /// Trade size distribution as `(span, minimum)`: sizes are drawn from
    /// `minimum .. minimum + span`
    pub const fn trade_size(self) -> (f64, f64) {
        match self {
            Self::Btc => (0.08, 0.004),
            Self::Eth => (1.2, 0.03),
            Self::Sol => (25.0, 0.5),
            Self::Usdc => (2500.0, 25.0),
        }
    }

    /// Keep a raw walk price inside the asset's allowed region
    pub fn clamp_price(self, price: f64) -> f64 {
        if self.is_stable() {
            price.clamp(STABLE_BAND_LOW, STABLE_BAND_HIGH)
        } else {
            price.max(PRICE_FLOOR)
        }
    }

    /// Convert a raw walk price to a display-precision decimal
    pub fn round_price(self, price: f64) -> Decimal {
        round_to(price, self.precision())
    }

    /// All supported symbols in declaration order
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

impl FromStr for Symbol {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        Self::iter()
            .find(|symbol| symbol.as_ref().eq_ignore_ascii_case(token))
            .ok_or_else(|| EngineError::UnknownSymbol(token.to_string()))
    }
}

/// Point count and spacing of a display range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub points: usize,
    pub step_ms: i64,
}

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// A display window for charts
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
pub enum Range {
    #[serde(rename = "1D")]
    #[strum(serialize = "1D")]
    OneDay,

    #[serde(rename = "1W")]
    #[strum(serialize = "1W")]
    OneWeek,

    #[serde(rename = "1M")]
    #[strum(serialize = "1M")]
    OneMonth,

    #[serde(rename = "1Y")]
    #[strum(serialize = "1Y")]
    OneYear,
}

impl Range {
    pub const fn config(self) -> RangeConfig {
        match self {
            // 24 hours of 5-minute points
            Self::OneDay => RangeConfig { points: 288, step_ms: 5 * MINUTE_MS },
            // 7 days of hourly points
            Self::OneWeek => RangeConfig { points: 168, step_ms: HOUR_MS },
            // ~30 days of 4-hour points
            Self::OneMonth => RangeConfig { points: 180, step_ms: 4 * HOUR_MS },
            // 1 year of daily points
            Self::OneYear => RangeConfig { points: 365, step_ms: DAY_MS },
        }
    }

    /// Longer ranges swing harder
    pub const fn volatility_multiplier(self) -> f64 {
        match self {
            Self::OneDay => 0.7,
            Self::OneWeek => 1.0,
            Self::OneMonth => 1.4,
            Self::OneYear => 2.2,
        }
    }

    /// Distance between the first and last point of a full series
    pub const fn expected_span_ms(self) -> i64 {
        let cfg = self.config();
        (cfg.points as i64 - 1) * cfg.step_ms
    }

    /// Fewest points an externally supplied series may carry and still be
    /// trusted for this range
    pub const fn min_valid_points(self) -> usize {
        let sixty_pct = self.config().points * 6 / 10;
        if sixty_pct > 20 { sixty_pct } else { 20 }
    }

    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

impl FromStr for Range {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        Self::iter()
            .find(|range| range.as_ref().eq_ignore_ascii_case(token))
            .ok_or_else(|| EngineError::UnknownRange(token.to_string()))
    }
}

/// Round half away from zero, matching how prices are displayed
pub(crate) fn round_to(value: f64, dp: u32) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_parsing() {
        assert_eq!("btc".parse::<Symbol>().unwrap(), Symbol::Btc);
        assert_eq!(" USDC ".parse::<Symbol>().unwrap(), Symbol::Usdc);
        assert!(matches!(
            "DOGE".parse::<Symbol>(),
            Err(EngineError::UnknownSymbol(s)) if s == "DOGE"
        ));
    }

    #[test]
    fn test_symbol_display_and_serde() {
        assert_eq!(Symbol::Sol.to_string(), "SOL");
        assert_eq!(serde_json::to_string(&Symbol::Eth).unwrap(), "\"ETH\"");
        let parsed: Symbol = serde_json::from_str("\"USDC\"").unwrap();
        assert_eq!(parsed, Symbol::Usdc);
    }

    #[test]
    fn test_range_tokens() {
        assert_eq!("1y".parse::<Range>().unwrap(), Range::OneYear);
        assert_eq!(Range::OneWeek.to_string(), "1W");
        assert_eq!(serde_json::to_string(&Range::OneMonth).unwrap(), "\"1M\"");
        assert!("5Y".parse::<Range>().is_err());
    }

    #[test]
    fn test_range_table() {
        assert_eq!(Range::OneDay.config(), RangeConfig { points: 288, step_ms: 300_000 });
        assert_eq!(Range::OneYear.config().points, 365);
        assert_eq!(Range::OneDay.expected_span_ms(), 287 * 300_000);
        assert_eq!(Range::OneDay.min_valid_points(), 172);
        assert_eq!(Range::OneWeek.min_valid_points(), 100);
    }

    #[test]
    fn test_clamping() {
        assert!((Symbol::Usdc.clamp_price(1.2) - STABLE_BAND_HIGH).abs() < f64::EPSILON);
        assert!((Symbol::Usdc.clamp_price(0.5) - STABLE_BAND_LOW).abs() < f64::EPSILON);
        assert!((Symbol::Btc.clamp_price(-4.0) - PRICE_FLOOR).abs() < f64::EPSILON);
        assert!((Symbol::Eth.clamp_price(3000.5) - 3000.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rounding_precision() {
        assert_eq!(Symbol::Btc.round_price(63000.125), dec!(63000.13));
        assert_eq!(Symbol::Usdc.round_price(1.000_04), dec!(1.0000));
        assert_eq!(Symbol::Usdc.round_price(1.004_96), dec!(1.0050));
    }
}
