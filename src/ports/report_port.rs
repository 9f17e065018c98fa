//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::CrossError;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::series::Series;

/// Everything a reporter may draw from a finished run.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub series: &'a Series,
    pub indicators: &'a IndicatorSeries,
    pub result: &'a BacktestResult,
}

impl ReportContext<'_> {
    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }
}

/// Port for presenting backtest results.
pub trait ReportPort {
    fn write(&self, ctx: &ReportContext<'_>) -> Result<(), CrossError>;
}
