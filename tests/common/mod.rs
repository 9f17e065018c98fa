#![allow(dead_code)]

use chrono::NaiveDate;
use crosstrader::domain::backtest::{BacktestConfig, DEFAULT_BUDGET};
pub use crosstrader::domain::bar::RawBar;
use crosstrader::domain::error::CrossError;
use crosstrader::domain::indicator::Windows;
use crosstrader::ports::data_port::DataPort;
use crosstrader::ports::report_port::{ReportContext, ReportPort};
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<RawBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<RawBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RawBar>, CrossError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CrossError::Provider {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date < end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossError> {
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

/// Records what each report call saw.
#[derive(Default)]
pub struct RecordingReporter {
    pub calls: RefCell<Vec<(String, usize, Decimal)>>,
}

impl ReportPort for RecordingReporter {
    fn write(&self, ctx: &ReportContext<'_>) -> Result<(), CrossError> {
        self.calls.borrow_mut().push((
            ctx.symbol().to_string(),
            ctx.series.len(),
            ctx.result.cumulative_pnl(),
        ));
        Ok(())
    }
}

pub struct FailingReporter;

impl ReportPort for FailingReporter {
    fn write(&self, _ctx: &ReportContext<'_>) -> Result<(), CrossError> {
        Err(CrossError::Report {
            reason: "disk full".into(),
        })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn start_date() -> NaiveDate {
    date(2020, 1, 1)
}

pub fn nth_day(i: usize) -> NaiveDate {
    start_date() + chrono::Duration::days(i as i64)
}

pub fn bars_from(closes: &[Decimal]) -> Vec<RawBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| RawBar::new(nth_day(i), c))
        .collect()
}

/// 200 falling bars, then a rising leg: one golden cross partway up.
pub fn dip_then_rally(len: usize) -> Vec<Decimal> {
    (0..len)
        .map(|i| {
            if i < 200 {
                Decimal::from(300 - i as i64)
            } else {
                Decimal::from(400 + i as i64)
            }
        })
        .collect()
}

pub fn sample_config(symbol: &str) -> BacktestConfig {
    BacktestConfig {
        symbol: symbol.to_string(),
        start_date: start_date(),
        end_date: date(2030, 1, 1),
        budget: DEFAULT_BUDGET,
        windows: Windows::default(),
    }
}

/// Serialize closes as a provider-style CSV file body.
pub fn csv_body(closes: &[Option<Decimal>]) -> String {
    let mut body = String::from("Date,Open,High,Low,Close,Volume\n");
    for (i, close) in closes.iter().enumerate() {
        let cell = close.map(|c| c.to_string()).unwrap_or_default();
        body.push_str(&format!("{},0,0,0,{},1000\n", nth_day(i), cell));
    }
    body
}
