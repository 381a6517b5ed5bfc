//! Domain Models
//!
//! Wallets, holdings and the live price map.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::market::Symbol;
use crate::rng::UniformSource;

/// A position in one asset inside a wallet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Asset symbol
    pub symbol: Symbol,

    /// Quantity held (never negative)
    pub quantity: Decimal,

    /// Average cost basis per unit in USD
    pub avg_cost: Decimal,
}

impl Holding {
    pub fn new(symbol: Symbol, quantity: Decimal, avg_cost: Decimal) -> Result<Self> {
        let holding = Self { symbol, quantity, avg_cost };
        holding.validate()?;
        Ok(holding)
    }

    pub fn validate(&self) -> Result<()> {
        if self.quantity < Decimal::ZERO {
            return Err(EngineError::InvalidHolding {
                symbol: self.symbol.to_string(),
                reason: format!("quantity {} is negative", self.quantity),
            });
        }
        if self.avg_cost < Decimal::ZERO {
            return Err(EngineError::InvalidHolding {
                symbol: self.symbol.to_string(),
                reason: format!("average cost {} is negative", self.avg_cost),
            });
        }
        Ok(())
    }

    /// Total cost of the holding
    pub fn total_cost(&self) -> Decimal {
        self.quantity * self.avg_cost
    }

    /// Value at the given prices (0 if the symbol is unpriced)
    pub fn value(&self, prices: &PriceMap) -> Decimal {
        self.quantity * prices.price_or_zero(self.symbol)
    }
}

/// A named wallet with an ordered list of holdings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Wallet identifier
    pub id: String,

    /// Display name (e.g., "Coinbase", "Ledger")
    pub name: String,

    /// Holdings in display order
    pub holdings: Vec<Holding>,
}

impl Wallet {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            holdings: Vec::new(),
        }
    }

    /// Builder-style holding insertion; rejects negative quantities or costs
    pub fn with_holding(mut self, symbol: Symbol, quantity: Decimal, avg_cost: Decimal) -> Result<Self> {
        self.holdings.push(Holding::new(symbol, quantity, avg_cost)?);
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.holdings.iter().try_for_each(Holding::validate)
    }
}

/// Direction of a price between two ticks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceMove {
    Up,
    Down,
    Flat,
}

impl PriceMove {
    pub fn between(previous: Decimal, current: Decimal) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Greater => Self::Up,
            std::cmp::Ordering::Less => Self::Down,
            std::cmp::Ordering::Equal => Self::Flat,
        }
    }
}

/// Current USD price per symbol.
///
/// Treated as an immutable snapshot: a tick produces a new map via
/// [`PriceMap::perturbed`] rather than editing one in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceMap {
    prices: BTreeMap<Symbol, Decimal>,
}

impl PriceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference prices for every supported symbol
    pub fn reference() -> Self {
        Symbol::all()
            .into_iter()
            .map(|symbol| (symbol, symbol.reference_price()))
            .collect()
    }

    pub fn with_price(mut self, symbol: Symbol, price: Decimal) -> Self {
        self.insert(symbol, price);
        self
    }

    pub fn insert(&mut self, symbol: Symbol, price: Decimal) -> Option<Decimal> {
        self.prices.insert(symbol, price)
    }

    pub fn get(&self, symbol: Symbol) -> Option<Decimal> {
        self.prices.get(&symbol).copied()
    }

    /// Missing symbols read as zero
    pub fn price_or_zero(&self, symbol: Symbol) -> Decimal {
        self.get(symbol).unwrap_or(Decimal::ZERO)
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.prices.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Decimal)> + '_ {
        self.prices.iter().map(|(s, p)| (*s, *p))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Build the next tick's map: every symbol present takes one
    /// multiplicative step of `(U - 0.5) * ticker_volatility`, then is
    /// clamped to its allowed region.
    pub fn perturbed(&self, source: &mut impl UniformSource) -> Self {
        self.iter()
            .map(|(symbol, price)| {
                let drift = (source.next_unit() - 0.5) * symbol.ticker_volatility();
                let raw = price.to_f64().unwrap_or(0.0) * (1.0 + drift);
                let next = Decimal::from_f64(symbol.clamp_price(raw)).unwrap_or(price);
                (symbol, next)
            })
            .collect()
    }

    /// Direction of `symbol` relative to an earlier snapshot
    pub fn movement(&self, previous: &Self, symbol: Symbol) -> PriceMove {
        match (previous.get(symbol), self.get(symbol)) {
            (Some(before), Some(now)) => PriceMove::between(before, now),
            _ => PriceMove::Flat,
        }
    }
}

impl FromIterator<(Symbol, Decimal)> for PriceMap {
    fn from_iter<I: IntoIterator<Item = (Symbol, Decimal)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}
