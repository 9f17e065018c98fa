//! Property tests for the crossover scan.

mod common;

use common::*;
use crosstrader::domain::engine::run_backtest;
use crosstrader::domain::indicator::{Windows, compute_indicators};
use crosstrader::domain::position::TradeEvent;
use crosstrader::domain::series::clean;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn closes_strategy(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1u32..50_000, len)
        .prop_map(|cents| cents.into_iter().map(|c| Decimal::new(c as i64, 2)).collect())
}

fn small_windows() -> impl Strategy<Value = Windows> {
    (1usize..10, 1usize..20).prop_map(|(fast, extra)| Windows {
        fast,
        slow: fast + extra,
    })
}

proptest! {
    #[test]
    fn short_history_never_trades(closes in closes_strategy(1..200)) {
        let series = clean("P", bars_from(&closes)).unwrap();
        let indicators = compute_indicators(&series, Windows::default());
        let result = run_backtest(&series, &indicators, Decimal::from(5000));
        prop_assert!(result.events.is_empty());
        prop_assert_eq!(result.cumulative_pnl(), Decimal::ZERO);
    }

    #[test]
    fn buys_and_sells_alternate(
        closes in closes_strategy(2..120),
        windows in small_windows(),
        budget in 1u32..100_000,
    ) {
        let series = clean("P", bars_from(&closes)).unwrap();
        let indicators = compute_indicators(&series, windows);
        let result = run_backtest(&series, &indicators, Decimal::from(budget));

        let mut open = 0i32;
        for event in &result.events {
            match event {
                TradeEvent::Buy(_) => open += 1,
                TradeEvent::Sell(_) => open -= 1,
            }
            prop_assert!(open == 0 || open == 1);
        }
        prop_assert_eq!(open, 0);

        // Only the final sell may be a forced liquidation, and only on the last bar.
        let sells = result.sells();
        for (i, sell) in sells.iter().enumerate() {
            if sell.forced {
                prop_assert_eq!(i, sells.len() - 1);
                prop_assert_eq!(sell.date, series.last().unwrap().date);
            }
        }
    }

    #[test]
    fn pnl_is_sum_of_trade_pnls(
        closes in closes_strategy(2..120),
        windows in small_windows(),
    ) {
        let series = clean("P", bars_from(&closes)).unwrap();
        let indicators = compute_indicators(&series, windows);
        let result = run_backtest(&series, &indicators, Decimal::from(5000));

        let total: Decimal = result.sells().iter().map(|s| s.pnl).sum();
        prop_assert_eq!(total, result.cumulative_pnl());
        for (buy, sell) in result.buys().iter().zip(result.sells().iter()) {
            prop_assert_eq!(buy.share_count, sell.share_count);
            prop_assert_eq!(sell.pnl, (sell.price - buy.price) * Decimal::from(buy.share_count));
            prop_assert!(buy.date <= sell.date);
        }
    }

    #[test]
    fn indicators_are_idempotent(closes in closes_strategy(1..80), windows in small_windows()) {
        let series = clean("P", bars_from(&closes)).unwrap();
        prop_assert_eq!(
            compute_indicators(&series, windows),
            compute_indicators(&series, windows)
        );
    }
}
