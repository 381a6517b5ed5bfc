//! Mock wallets and opening prices for the demo dashboard.

use rust_decimal_macros::dec;

use crate::error::Result;
use crate::market::Symbol;
use crate::model::{PriceMap, Wallet};

/// Two wallets: an exchange account and a hardware wallet
pub fn sample_wallets() -> Result<Vec<Wallet>> {
    Ok(vec![
        Wallet::new("w1", "Coinbase")
            .with_holding(Symbol::Btc, dec!(0.42), dec!(52000))?
            .with_holding(Symbol::Eth, dec!(6.1), dec!(2900))?
            .with_holding(Symbol::Usdc, dec!(2500), dec!(1))?,
        Wallet::new("w2", "Ledger")
            .with_holding(Symbol::Sol, dec!(85), dec!(55))?
            .with_holding(Symbol::Eth, dec!(1.9), dec!(3100))?,
    ])
}

/// Opening ticker prices
pub fn initial_prices() -> PriceMap {
    PriceMap::reference()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_wallets() {
        let wallets = sample_wallets().unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets[0].name, "Coinbase");
        assert_eq!(wallets[1].holdings.len(), 2);
        assert!(wallets.iter().all(|w| w.validate().is_ok()));
    }

    #[test]
    fn test_initial_prices_cover_every_symbol() {
        let prices = initial_prices();
        for symbol in Symbol::all() {
            assert!(prices.get(symbol).is_some(), "{symbol} missing");
        }
    }
}
