//! Error Types for the Dashboard Engine
//!
//! Arithmetic in the engine is total (divisions fall back to zero), so these
//! errors only surface at input boundaries: parsing tokens, validating
//! holdings, loading configuration and talking to a price feed.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Unknown range: {0}")]
    UnknownRange(String),

    #[error("Invalid holding for {symbol}: {reason}")]
    InvalidHolding {
        symbol: String,
        reason: String,
    },

    #[error("Price feed error: {0}")]
    Feed(String),

    #[error("Price feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Feed failures are expected to clear up on a later tick.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Feed(_) | Self::FeedUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_errors_are_transient() {
        assert!(EngineError::Feed("timeout".into()).is_transient());
        assert!(EngineError::FeedUnavailable("offline".into()).is_transient());
        assert!(!EngineError::Config("bad".into()).is_transient());
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidHolding {
            symbol: "BTC".into(),
            reason: "quantity must not be negative".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid holding for BTC: quantity must not be negative"
        );
    }
}
