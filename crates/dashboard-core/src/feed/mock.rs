//! Mock Price Feed
//!
//! Random-walk prices for demos and tests. Never fails.

use std::sync::Mutex;

use async_trait::async_trait;

use super::PriceFeed;
use crate::error::Result;
use crate::model::PriceMap;
use crate::rng::{Mulberry32, ThreadEntropy};

enum Entropy {
    Thread,
    Seeded(Mutex<Mulberry32>),
}

/// Mock feed that perturbs every symbol by its ticker volatility each tick
pub struct MockPriceFeed {
    entropy: Entropy,
}

impl Default for MockPriceFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPriceFeed {
    /// Non-reproducible walk
    pub const fn new() -> Self {
        Self { entropy: Entropy::Thread }
    }

    /// Reproducible walk (for testing)
    pub fn seeded(seed: u32) -> Self {
        Self {
            entropy: Entropy::Seeded(Mutex::new(Mulberry32::new(seed))),
        }
    }

    /// One synchronous step; the async trait method delegates here
    pub fn step(&self, current: &PriceMap) -> PriceMap {
        match &self.entropy {
            Entropy::Thread => current.perturbed(&mut ThreadEntropy),
            Entropy::Seeded(rng) => {
                // A poisoned lock still holds a usable generator state
                let mut rng = rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                current.perturbed(&mut *rng)
            }
        }
    }
}

#[async_trait]
impl PriceFeed for MockPriceFeed {
    async fn next_prices(&self, current: &PriceMap) -> Result<PriceMap> {
        Ok(self.step(current))
    }

    fn name(&self) -> &str {
        "MockPriceFeed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Symbol;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_feed_keeps_symbols() {
        let feed = MockPriceFeed::new();
        let current = PriceMap::reference();
        let next = feed.next_prices(&current).await.unwrap();

        assert!(next.symbols().eq(current.symbols()));
        assert_eq!(feed.name(), "MockPriceFeed");
    }

    #[tokio::test]
    async fn test_seeded_feed_is_reproducible() {
        let a = MockPriceFeed::seeded(5);
        let b = MockPriceFeed::seeded(5);
        let mut pa = PriceMap::reference();
        let mut pb = PriceMap::reference();
        for _ in 0..10 {
            pa = a.next_prices(&pa).await.unwrap();
            pb = b.next_prices(&pb).await.unwrap();
        }
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_step_moves_by_at_most_half_volatility() {
        let feed = MockPriceFeed::seeded(1);
        let current = PriceMap::new().with_price(Symbol::Btc, dec!(63000));
        let next = feed.step(&current);
        let moved = (next.price_or_zero(Symbol::Btc) - dec!(63000)).abs();
        // |drift| <= 0.008 / 2
        assert!(moved <= dec!(252.01), "moved {moved}");
    }

    #[test]
    fn test_empty_map_stays_empty() {
        assert!(MockPriceFeed::new().step(&PriceMap::new()).is_empty());
    }
}
