//! Per-wallet valuation helpers for balance cards and chart targeting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market::Symbol;
use crate::model::{PriceMap, PriceMove, Wallet};

/// A wallet's value across one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletChange {
    pub previous: Decimal,
    pub current: Decimal,
    pub delta: Decimal,
    pub direction: PriceMove,
}

/// Value of `wallet` at `prices`; unpriced symbols count as 0
pub fn wallet_value(wallet: &Wallet, prices: &PriceMap) -> Decimal {
    wallet.holdings.iter().map(|h| h.value(prices)).sum()
}

pub fn wallet_change(wallet: &Wallet, current: &PriceMap, previous: &PriceMap) -> WalletChange {
    let now = wallet_value(wallet, current);
    let before = wallet_value(wallet, previous);

    WalletChange {
        previous: before,
        current: now,
        delta: now - before,
        direction: PriceMove::between(before, now),
    }
}

/// The holding worth the most at `prices`. Ties go to the earlier holding.
pub fn dominant_symbol(wallet: &Wallet, prices: &PriceMap) -> Option<Symbol> {
    wallet
        .holdings
        .iter()
        .map(|h| (h.symbol, h.value(prices)))
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .map(|(symbol, _)| symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn coinbase() -> Wallet {
        Wallet::new("w1", "Coinbase")
            .with_holding(Symbol::Btc, dec!(0.42), dec!(52000))
            .and_then(|w| w.with_holding(Symbol::Eth, dec!(6.1), dec!(2900)))
            .and_then(|w| w.with_holding(Symbol::Usdc, dec!(2500), dec!(1)))
            .unwrap()
    }

    #[test]
    fn test_wallet_value() {
        // 26460 + 20740 + 2500
        assert_eq!(wallet_value(&coinbase(), &PriceMap::reference()), dec!(49700));
        assert_eq!(wallet_value(&coinbase(), &PriceMap::new()), Decimal::ZERO);
    }

    #[test]
    fn test_wallet_change() {
        let before = PriceMap::reference();
        let after = before.clone().with_price(Symbol::Btc, dec!(64000));
        let change = wallet_change(&coinbase(), &after, &before);

        assert_eq!(change.delta, dec!(420));
        assert_eq!(change.direction, PriceMove::Up);
        assert_eq!(change.current - change.previous, change.delta);

        let flat = wallet_change(&coinbase(), &before, &before);
        assert_eq!(flat.direction, PriceMove::Flat);
    }

    #[test]
    fn test_dominant_symbol() {
        assert_eq!(dominant_symbol(&coinbase(), &PriceMap::reference()), Some(Symbol::Btc));

        let eth_rally = PriceMap::reference().with_price(Symbol::Eth, dec!(5000));
        assert_eq!(dominant_symbol(&coinbase(), &eth_rally), Some(Symbol::Eth));

        assert_eq!(dominant_symbol(&Wallet::new("w", "Empty"), &PriceMap::reference()), None);
    }

    #[test]
    fn test_dominant_symbol_tie_keeps_first() {
        // With no prices every holding is worth 0
        assert_eq!(dominant_symbol(&coinbase(), &PriceMap::new()), Some(Symbol::Btc));
    }
}
