//! Synthetic Series Generator
//!
//! A seeded multiplicative random walk, walked from the oldest point to
//! `end_ms` so the output is already in chart order.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::{Series, SeriesPoint};
use crate::market::{Range, Symbol};
use crate::rng::{Mulberry32, UniformSource, seed_for};

/// Generate history ending at the current wall-clock time.
///
/// Values depend only on `(symbol, range, start_price, seed)`; timestamps
/// are anchored to now. Use [`generate_series_at`] when the timestamps must
/// be reproducible too.
pub fn generate_series(symbol: Symbol, range: Range, start_price: Decimal, seed: Option<u32>) -> Series {
    generate_series_at(symbol, range, start_price, seed, Utc::now().timestamp_millis())
}

/// Generate history whose newest point sits exactly at `end_ms`.
///
/// The seed defaults to [`seed_for`]`(symbol, range)`.
pub fn generate_series_at(
    symbol: Symbol,
    range: Range,
    start_price: Decimal,
    seed: Option<u32>,
    end_ms: i64,
) -> Series {
    let cfg = range.config();
    let volatility = symbol.series_volatility() * range.volatility_multiplier();
    let mut rng = Mulberry32::new(seed.unwrap_or_else(|| seed_for(symbol, range)));

    let mut price = symbol.clamp_price(start_price.to_f64().unwrap_or(0.0));
    let mut points = Vec::with_capacity(cfg.points);

    for back in (0..cfg.points as i64).rev() {
        let drift = (rng.next_unit() - 0.5) * volatility;
        price = symbol.clamp_price(price * (1.0 + drift));
        points.push(SeriesPoint::new(end_ms - back * cfg.step_ms, symbol.round_price(price)));
    }

    Series::new(points)
}

/// Whether an externally supplied series covers `range` well enough to be
/// charted instead of a generated one.
///
/// Requires at least two points, a timestamp span of at least 75% of the
/// range's full span, and at least `max(20, 60% of the point count)` points.
pub fn is_valid_series(points: &[SeriesPoint], range: Range) -> bool {
    if points.len() < 2 {
        return false;
    }
    if points.len() < range.min_valid_points() {
        return false;
    }

    let (min, max) = points.iter().fold((i64::MAX, i64::MIN), |(lo, hi), p| {
        (lo.min(p.timestamp_ms), hi.max(p.timestamp_ms))
    });
    // span * 4 >= expected * 3, kept in integers
    max.saturating_sub(min).saturating_mul(4) >= range.expected_span_ms().saturating_mul(3)
}

/// Use `candidate` if it passes [`is_valid_series`], otherwise generate a
/// fresh series for `(symbol, range)` from `start_price`.
pub fn resolve_series(
    candidate: Option<&Series>,
    symbol: Symbol,
    range: Range,
    start_price: Decimal,
    end_ms: i64,
) -> Series {
    match candidate {
        Some(series) if is_valid_series(&series.points, range) => series.clone(),
        Some(series) => {
            tracing::debug!(
                %symbol, %range, points = series.len(), span_ms = series.span_ms(),
                "supplied series rejected, generating fallback"
            );
            generate_series_at(symbol, range, start_price, None, end_ms)
        }
        None => {
            tracing::debug!(%symbol, %range, "no series supplied, generating fallback");
            generate_series_at(symbol, range, start_price, None, end_ms)
        }
    }
}
