//! Crossover signal detection and the long-only trade state machine.
//!
//! The scan visits every bar from index 1, comparing the averages at the
//! previous and current bar. A golden cross opens a position when flat, a
//! death cross closes it when long. Anything left open is sold at the last
//! bar's close.
//!
//! State lives in an [`EngineState`] value that [`step`] takes and returns,
//! so a caller can drive the scan one bar at a time.

use crate::domain::account::Account;
use crate::domain::backtest::BacktestResult;
use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries};
use crate::domain::position::{BuyEvent, Position, SellEvent, TradeEvent};
use crate::domain::series::Series;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cross {
    /// Fast average moved from below to above the slow average.
    Golden,
    /// Fast average moved from above to below the slow average.
    Death,
}

/// Classify the move between two consecutive points.
///
/// Both points need both averages. Equality on either side is not a cross.
pub fn detect_cross(prev: &IndicatorPoint, curr: &IndicatorPoint) -> Option<Cross> {
    let (prev_fast, prev_slow) = prev.pair()?;
    let (curr_fast, curr_slow) = curr.pair()?;

    if prev_fast < prev_slow && curr_fast > curr_slow {
        Some(Cross::Golden)
    } else if prev_fast > prev_slow && curr_fast < curr_slow {
        Some(Cross::Death)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub account: Account,
    pub position: Option<Position>,
    pub events: Vec<TradeEvent>,
}

impl EngineState {
    pub fn new(budget: Decimal) -> Self {
        Self {
            account: Account::new(budget),
            position: None,
            events: Vec::new(),
        }
    }

    pub fn is_long(&self) -> bool {
        self.position.is_some()
    }

    /// Open a position with as many whole shares as the budget buys.
    ///
    /// Does nothing when already long or when not even one share is affordable.
    pub fn buy(&mut self, price: Decimal, date: NaiveDate) -> Option<BuyEvent> {
        if self.is_long() {
            return None;
        }

        let share_count = self.account.shares_affordable(price);
        if share_count == 0 {
            debug!(%date, %price, budget = %self.account.budget, "buy skipped: budget too small");
            return None;
        }

        self.position = Some(Position {
            entry_date: date,
            entry_price: price,
            share_count,
        });
        let event = BuyEvent {
            date,
            price,
            share_count,
        };
        self.events.push(TradeEvent::Buy(event));
        debug!(%date, %price, share_count, "bought");
        Some(event)
    }

    /// Close the open position and realize its P/L. No-op when flat.
    pub fn sell(&mut self, price: Decimal, date: NaiveDate, forced: bool) -> Option<SellEvent> {
        let position = self.position.take()?;
        let pnl = position.pnl_at(price);
        self.account.realize(pnl);

        let event = SellEvent {
            date,
            price,
            share_count: position.share_count,
            pnl,
            forced,
        };
        self.events.push(TradeEvent::Sell(event));
        debug!(%date, %price, %pnl, forced, "sold");
        Some(event)
    }

    pub fn into_result(self) -> BacktestResult {
        BacktestResult {
            account: self.account,
            events: self.events,
        }
    }
}

/// Advance the state machine by one bar.
///
/// `bar` is the bar at the same index as `curr`; trades execute at its close.
pub fn step(
    mut state: EngineState,
    prev: &IndicatorPoint,
    curr: &IndicatorPoint,
    bar: &Bar,
) -> EngineState {
    match detect_cross(prev, curr) {
        Some(Cross::Golden) if !state.is_long() => {
            debug!(date = %bar.date, "golden cross");
            state.buy(bar.close, bar.date);
        }
        Some(Cross::Death) if state.is_long() => {
            debug!(date = %bar.date, "death cross");
            state.sell(bar.close, bar.date, false);
        }
        Some(cross) => {
            debug!(date = %bar.date, ?cross, "cross ignored in current state");
        }
        None => {}
    }
    state
}

/// Sell any open position at `last`.
pub fn liquidate(mut state: EngineState, last: &Bar) -> EngineState {
    if state.is_long() {
        debug!(date = %last.date, "liquidating open position at end of run");
        state.sell(last.close, last.date, true);
    }
    state
}

/// Scan `series` with its aligned `indicators` and return the realized trades.
pub fn run_backtest(
    series: &Series,
    indicators: &IndicatorSeries,
    budget: Decimal,
) -> BacktestResult {
    debug_assert_eq!(series.len(), indicators.len());

    let mut state = EngineState::new(budget);
    for (pair, bar) in indicators
        .points
        .windows(2)
        .zip(series.bars().iter().skip(1))
    {
        state = step(state, &pair[0], &pair[1], bar);
    }

    if let Some(last) = series.last() {
        state = liquidate(state, last);
    }

    state.into_result()
}
