//! Portfolio
//!
//! Folds static wallets and a price snapshot into valuation, allocation and
//! P&L summaries. Everything here is pure: the same inputs always give the
//! same summary.

mod aggregator;
pub mod report;
mod valuation;

pub use aggregator::{
    AggregatedHolding, AllocationEntry, HoldingValuation, PortfolioSummary,
    aggregate_holdings, aggregate_portfolio,
};
pub use valuation::{WalletChange, dominant_symbol, wallet_change, wallet_value};
