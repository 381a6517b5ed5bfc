//! Price Series
//!
//! Seeded synthetic history for charts, the validity check that decides
//! whether a supplied series can be trusted, and per-wallet value series.

mod book;
mod generator;

pub use book::{SeriesBook, wallet_series};
pub use generator::{
    generate_series, generate_series_at, is_valid_series, resolve_series,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One chart sample
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Milliseconds since the Unix epoch
    #[serde(rename = "t")]
    pub timestamp_ms: i64,

    /// Price (or wallet value) at that instant
    #[serde(rename = "v")]
    pub value: Decimal,
}

impl SeriesPoint {
    pub const fn new(timestamp_ms: i64, value: Decimal) -> Self {
        Self { timestamp_ms, value }
    }
}

/// Points for one (asset, range) pair, oldest first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
}

/// Open/close/extremes over a series
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,

    /// `close - open`
    pub change: Decimal,

    /// `change / open`, 0 when the series opens at 0
    pub change_pct: Decimal,
}

impl Series {
    pub const fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Value at position `index`, if present
    pub fn value_at(&self, index: usize) -> Option<Decimal> {
        self.points.get(index).map(|p| p.value)
    }

    /// Distance between the earliest and latest timestamps, saturating at
    /// `i64::MAX`
    pub fn span_ms(&self) -> i64 {
        let mut times = self.points.iter().map(|p| p.timestamp_ms);
        let Some(first) = times.next() else {
            return 0;
        };
        let (min, max) = times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        max.saturating_sub(min)
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[0].timestamp_ms < w[1].timestamp_ms)
    }

    pub fn stats(&self) -> Option<SeriesStats> {
        let open = self.first()?.value;
        let close = self.last()?.value;
        let (high, low) = self
            .points
            .iter()
            .fold((open, open), |(hi, lo), p| (hi.max(p.value), lo.min(p.value)));
        let change = close - open;
        let change_pct = if open.is_zero() { Decimal::ZERO } else { change / open };

        Some(SeriesStats { open, close, high, low, change, change_pct })
    }
}

impl From<Vec<SeriesPoint>> for Series {
    fn from(points: Vec<SeriesPoint>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn series(values: &[(i64, Decimal)]) -> Series {
        values.iter().map(|&(t, v)| SeriesPoint::new(t, v)).collect::<Vec<_>>().into()
    }

    #[test]
    fn test_span_and_order() {
        let s = series(&[(1_000, dec!(1)), (3_000, dec!(2)), (7_000, dec!(3))]);
        assert_eq!(s.span_ms(), 6_000);
        assert!(s.is_strictly_increasing());

        let unordered = series(&[(5_000, dec!(1)), (1_000, dec!(2)), (5_000, dec!(3))]);
        assert_eq!(unordered.span_ms(), 4_000);
        assert!(!unordered.is_strictly_increasing());

        assert_eq!(Series::default().span_ms(), 0);

        let extreme = series(&[(i64::MIN, dec!(1)), (i64::MAX, dec!(2))]);
        assert_eq!(extreme.span_ms(), i64::MAX);
    }

    #[test]
    fn test_stats() {
        let s = series(&[(1, dec!(100)), (2, dec!(120)), (3, dec!(90)), (4, dec!(110))]);
        let stats = s.stats().unwrap();
        assert_eq!(stats.open, dec!(100));
        assert_eq!(stats.close, dec!(110));
        assert_eq!(stats.high, dec!(120));
        assert_eq!(stats.low, dec!(90));
        assert_eq!(stats.change, dec!(10));
        assert_eq!(stats.change_pct, dec!(0.1));

        assert!(Series::default().stats().is_none());
    }

    #[test]
    fn test_point_wire_shape() {
        let json = serde_json::to_value(SeriesPoint::new(42, dec!(1.5))).unwrap();
        assert_eq!(json, serde_json::json!({ "t": 42, "v": "1.5" }));
    }
}
