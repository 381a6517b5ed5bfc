//! # dashboard-core
//!
//! Market data engine behind a mock crypto portfolio dashboard: seeded price
//! history for charts, a live mock price ticker, and the portfolio maths that
//! turns wallets plus prices into balances, allocation and P&L.
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────┐  next_prices   ┌──────────────┐  watch::Receiver
//! │ MockPriceFeed│ ◄───────────── │ PriceTicker  │ ─────────────────┐
//! └──────────────┘                └──────────────┘                  │
//!                                                                   ▼
//! ┌──────────────┐                ┌──────────────┐          ┌───────────────┐
//! │   Wallets    │ ─────────────► │  portfolio   │ ◄─────── │TickerSnapshot │
//! └──────────────┘                │  aggregate   │          │current/previous│
//!        │                        └──────────────┘          └───────────────┘
//!        │                               │
//!        ▼                               ▼
//! ┌──────────────┐                ┌──────────────┐
//! │  SeriesBook  │                │ text / json  │
//! │ 1D 1W 1M 1Y  │                │   report     │
//! └──────────────┘                └──────────────┘
//! ```
//!
//! Series generation is seeded per `(symbol, range)`, so the same chart
//! always draws the same shape. Only the ticker uses thread entropy.

pub mod config;
pub mod error;
pub mod feed;
pub mod fixtures;
pub mod market;
pub mod model;
pub mod portfolio;
pub mod rng;
pub mod series;
pub mod trades;

pub use config::{EngineConfig, ReportFormat};
pub use error::{EngineError, Result};
pub use feed::{FeedStatus, MockPriceFeed, PriceFeed, PriceTicker, TickerHandle, TickerSnapshot};
pub use market::{Range, Symbol};
pub use model::{Holding, PriceMap, PriceMove, Wallet};
pub use portfolio::{PortfolioSummary, aggregate_portfolio};
pub use series::{Series, SeriesBook, SeriesPoint};
pub use trades::{Trade, TradeHistoryParams, TradeQuery, TradeSide};
