//! Moving-average indicators aligned to a [`Series`].
//!
//! - `IndicatorPoint`: fast and slow averages for one bar
//! - `IndicatorSeries`: one point per bar of the source series

pub mod sma;

use crate::domain::series::Series;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

pub const DEFAULT_FAST_WINDOW: usize = 50;
pub const DEFAULT_SLOW_WINDOW: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub ma_fast: Option<Decimal>,
    pub ma_slow: Option<Decimal>,
}

impl IndicatorPoint {
    /// Both averages, once each has warmed up.
    pub fn pair(&self) -> Option<(Decimal, Decimal)> {
        self.ma_fast.zip(self.ma_slow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Windows {
    pub fast: usize,
    pub slow: usize,
}

impl Default for Windows {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST_WINDOW,
            slow: DEFAULT_SLOW_WINDOW,
        }
    }
}

impl fmt::Display for Windows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMA({})/SMA({})", self.fast, self.slow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSeries {
    pub windows: Windows,
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Compute the fast and slow SMAs of `series` closes.
pub fn compute_indicators(series: &Series, windows: Windows) -> IndicatorSeries {
    let closes = series.closes();
    let fast = sma::calculate_sma(&closes, windows.fast);
    let slow = sma::calculate_sma(&closes, windows.slow);

    let points = series
        .bars()
        .iter()
        .zip(fast.into_iter().zip(slow))
        .map(|(bar, (ma_fast, ma_slow))| IndicatorPoint {
            date: bar.date,
            ma_fast,
            ma_slow,
        })
        .collect();

    IndicatorSeries { windows, points }
}
