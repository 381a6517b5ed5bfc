//! Portfolio Aggregator

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market::Symbol;
use crate::model::{PriceMap, Wallet};

/// One symbol summed across every wallet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedHolding {
    pub symbol: Symbol,

    /// Total quantity across wallets
    pub quantity: Decimal,

    /// Quantity-weighted average cost, 0 when nothing is held
    pub avg_cost: Decimal,
}

/// An aggregated holding marked to a price
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub symbol: Symbol,
    pub quantity: Decimal,
    pub avg_cost: Decimal,
    pub price: Decimal,

    /// quantity * price
    pub value: Decimal,

    /// quantity * avg_cost
    pub cost: Decimal,

    /// value - cost
    pub pnl: Decimal,

    /// pnl / cost, 0 when cost is 0
    pub pnl_pct: Decimal,
}

impl AggregatedHolding {
    pub fn total_cost(&self) -> Decimal {
        self.quantity * self.avg_cost
    }

    pub fn value(&self, prices: &PriceMap) -> Decimal {
        self.quantity * prices.price_or_zero(self.symbol)
    }

    /// Mark to `prices` (a missing price counts as 0)
    pub fn valuation(&self, prices: &PriceMap) -> HoldingValuation {
        let price = prices.price_or_zero(self.symbol);
        let value = self.quantity * price;
        let cost = self.total_cost();
        let pnl = value - cost;

        HoldingValuation {
            symbol: self.symbol,
            quantity: self.quantity,
            avg_cost: self.avg_cost,
            price,
            value,
            cost,
            pnl,
            pnl_pct: ratio(pnl, cost),
        }
    }
}

/// One slice of the allocation breakdown
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub symbol: Symbol,
    pub value: Decimal,

    /// Share of total value in `[0, 1]`
    pub fraction: Decimal,
}

/// Everything the dashboard shows about the portfolio as a whole
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub pnl: Decimal,

    /// pnl / total_cost as a fraction, 0 when there is no cost basis
    pub pnl_pct: Decimal,

    /// In first-appearance order across wallets
    pub holdings: Vec<AggregatedHolding>,

    /// Descending by value
    pub allocation: Vec<AllocationEntry>,
}

impl PortfolioSummary {
    /// Per-holding valuation rows in holding order
    pub fn valuations(&self, prices: &PriceMap) -> Vec<HoldingValuation> {
        self.holdings.iter().map(|h| h.valuation(prices)).collect()
    }

    pub fn is_profitable(&self) -> bool {
        self.pnl > Decimal::ZERO
    }
}

/// Group holdings by symbol, keeping the order in which symbols first
/// appear across `wallets`.
pub fn aggregate_holdings(wallets: &[Wallet]) -> Vec<AggregatedHolding> {
    // (symbol, quantity, quantity * cost)
    let mut sums: Vec<(Symbol, Decimal, Decimal)> = Vec::new();

    for holding in wallets.iter().flat_map(|w| &w.holdings) {
        match sums.iter_mut().find(|(symbol, _, _)| *symbol == holding.symbol) {
            Some((_, quantity, cost)) => {
                *quantity += holding.quantity;
                *cost += holding.total_cost();
            }
            None => sums.push((holding.symbol, holding.quantity, holding.total_cost())),
        }
    }

    sums.into_iter()
        .map(|(symbol, quantity, cost)| AggregatedHolding {
            symbol,
            quantity,
            avg_cost: if quantity > Decimal::ZERO { cost / quantity } else { Decimal::ZERO },
        })
        .collect()
}

/// Combine `wallets` with `prices` into a summary.
///
/// Symbols missing from `prices` are valued at 0. Every ratio falls back to
/// 0 instead of dividing by zero.
pub fn aggregate_portfolio(wallets: &[Wallet], prices: &PriceMap) -> PortfolioSummary {
    let holdings = aggregate_holdings(wallets);

    let values: Vec<Decimal> = holdings.iter().map(|h| h.value(prices)).collect();
    let total_value: Decimal = values.iter().copied().sum();
    let total_cost: Decimal = holdings.iter().map(AggregatedHolding::total_cost).sum();
    let pnl = total_value - total_cost;

    let mut allocation: Vec<AllocationEntry> = holdings
        .iter()
        .zip(&values)
        .map(|(h, &value)| AllocationEntry {
            symbol: h.symbol,
            value,
            fraction: ratio(value, total_value),
        })
        .collect();
    // `sort_by` is stable, so equal values keep holding order
    allocation.sort_by(|a, b| b.value.cmp(&a.value));

    PortfolioSummary {
        total_value,
        total_cost,
        pnl,
        pnl_pct: ratio(pnl, total_cost),
        holdings,
        allocation,
    }
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator / denominator
    } else {
        Decimal::ZERO
    }
}
