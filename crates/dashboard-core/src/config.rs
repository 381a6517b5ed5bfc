//! Engine configuration read from `DASHBOARD_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::trades::{DEFAULT_PAD_SEED, TradeHistoryParams};

/// Ticks at or above this interval are rejected by [`EngineConfig::validate`]
pub const MAX_TICK_MS: u64 = 2000;

/// Longest trade window [`EngineConfig::validate`] accepts, about a century
pub const MAX_TRADE_DAYS: u32 = 36_500;

/// How the demo prints the portfolio summary
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(EngineError::Config(format!("unknown report format: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ticker period in milliseconds
    pub tick_ms: u64,

    pub trade_days: u32,
    pub trade_count: usize,
    pub trade_seed: u32,
    pub pad_seed: u32,

    /// Ticks the demo observes before stopping
    pub demo_ticks: usize,

    pub report: ReportFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let trades = TradeHistoryParams::default();
        Self {
            tick_ms: 1200,
            trade_days: trades.days,
            trade_count: trades.count,
            trade_seed: trades.seed,
            pad_seed: DEFAULT_PAD_SEED,
            demo_ticks: 10,
            report: ReportFormat::Text,
        }
    }
}

impl EngineConfig {
    /// Read from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `lookup`. Missing or unparsable values keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string());

        Self {
            tick_ms: parse_or(read("DASHBOARD_TICK_MS"), defaults.tick_ms),
            trade_days: parse_or(read("DASHBOARD_TRADE_DAYS"), defaults.trade_days),
            trade_count: parse_or(read("DASHBOARD_TRADE_COUNT"), defaults.trade_count),
            trade_seed: parse_or(read("DASHBOARD_TRADE_SEED"), defaults.trade_seed),
            pad_seed: parse_or(read("DASHBOARD_PAD_SEED"), defaults.pad_seed),
            demo_ticks: parse_or(read("DASHBOARD_DEMO_TICKS"), defaults.demo_ticks),
            report: parse_or(read("DASHBOARD_REPORT"), defaults.report),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 || self.tick_ms >= MAX_TICK_MS {
            return Err(EngineError::Config(format!(
                "tick interval must be between 1 and {} ms, got {}",
                MAX_TICK_MS - 1,
                self.tick_ms
            )));
        }
        if self.trade_days == 0 || self.trade_days > MAX_TRADE_DAYS {
            return Err(EngineError::Config(format!(
                "trade window must be between 1 and {MAX_TRADE_DAYS} days, got {}",
                self.trade_days
            )));
        }
        if self.trade_count == 0 {
            return Err(EngineError::Config("trade count must be positive".into()));
        }
        Ok(())
    }

    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub const fn trade_params(&self) -> TradeHistoryParams {
        TradeHistoryParams {
            days: self.trade_days,
            count: self.trade_count,
            seed: self.trade_seed,
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_millis(1200));
        assert_eq!(config.trade_params(), TradeHistoryParams::default());
        assert_eq!(config.pad_seed, 1337);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("DASHBOARD_TICK_MS", " 250 "),
            ("DASHBOARD_TRADE_COUNT", "40"),
            ("DASHBOARD_TRADE_SEED", "9"),
            ("DASHBOARD_REPORT", "JSON"),
        ]));
        assert_eq!(config.tick_ms, 250);
        assert_eq!(config.trade_count, 40);
        assert_eq!(config.trade_seed, 9);
        assert_eq!(config.report, ReportFormat::Json);
        assert_eq!(config.trade_days, 730);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("DASHBOARD_TICK_MS", "fast"),
            ("DASHBOARD_TRADE_DAYS", "-3"),
            ("DASHBOARD_REPORT", "yaml"),
        ]));
        assert_eq!(config.tick_ms, 1200);
        assert_eq!(config.trade_days, 730);
        assert_eq!(config.report, ReportFormat::Text);
    }

    #[test]
    fn test_validate_rejects_bad_intervals() {
        for tick_ms in [0, 2000, 5000] {
            let config = EngineConfig { tick_ms, ..EngineConfig::default() };
            assert!(matches!(config.validate(), Err(EngineError::Config(_))), "{tick_ms}");
        }
        let ok = EngineConfig { tick_ms: 1999, ..EngineConfig::default() };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_history() {
        let no_days = EngineConfig { trade_days: 0, ..EngineConfig::default() };
        assert!(no_days.validate().is_err());

        let no_trades = EngineConfig { trade_count: 0, ..EngineConfig::default() };
        assert!(no_trades.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_window() {
        let config = EngineConfig::from_lookup(lookup(&[("DASHBOARD_TRADE_DAYS", "200000000")]));
        assert_eq!(config.trade_days, 200_000_000);
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));

        let century = EngineConfig { trade_days: MAX_TRADE_DAYS, ..EngineConfig::default() };
        assert!(century.validate().is_ok());
    }
}
