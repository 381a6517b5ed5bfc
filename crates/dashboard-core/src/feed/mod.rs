//! Price Feeds
//!
//! Sources of live prices and the ticker that drives them.

mod mock;
mod ticker;

pub use mock::MockPriceFeed;
pub use ticker::{DEFAULT_TICK_INTERVAL, FeedStatus, PriceTicker, TickerHandle, TickerSnapshot};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::PriceMap;

/// Price feed trait (Strategy pattern)
///
/// The ticker asks the feed for the next snapshot once per interval. A feed
/// must return a fresh map and leave `current` untouched. Errors are
/// reported as a disconnect; the ticker keeps the last good prices.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Produce the next snapshot given the current one
    async fn next_prices(&self, current: &PriceMap) -> Result<PriceMap>;

    /// Feed name, for logs
    fn name(&self) -> &str;
}
