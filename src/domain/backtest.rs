//! Backtest parameters and results.
//!
//! BacktestConfig describes one run: which symbol, which dates, what budget
//! and which average windows.

use crate::domain::account::{Account, Outcome};
use crate::domain::indicator::Windows;
use crate::domain::position::{BuyEvent, SellEvent, TradeEvent};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DEFAULT_BUDGET: Decimal = dec!(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    /// Exclusive.
    pub end_date: NaiveDate,
    pub budget: Decimal,
    pub windows: Windows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktestResult {
    pub account: Account,
    /// Buys and sells in the order they happened.
    pub events: Vec<TradeEvent>,
}

impl BacktestResult {
    pub fn cumulative_pnl(&self) -> Decimal {
        self.account.cumulative_pnl
    }

    pub fn outcome(&self) -> Outcome {
        self.account.outcome()
    }

    pub fn buys(&self) -> Vec<BuyEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TradeEvent::Buy(b) => Some(*b),
                TradeEvent::Sell(_) => None,
            })
            .collect()
    }

    pub fn sells(&self) -> Vec<SellEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TradeEvent::Sell(s) => Some(*s),
                TradeEvent::Buy(_) => None,
            })
            .collect()
    }

    /// Completed round trips.
    pub fn trade_count(&self) -> usize {
        self.sells().len()
    }

    pub fn winning_trades(&self) -> usize {
        self.sells().iter().filter(|s| s.pnl > Decimal::ZERO).count()
    }
}
