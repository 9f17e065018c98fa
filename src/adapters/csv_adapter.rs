//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row. The
//! `Date` column is required; the close comes from `Close`, or `Adj Close`
//! when there is no `Close` column. Header matching ignores case. Empty,
//! `null` and `NaN` close cells are reported as missing. Closes beyond
//! [`MAX_CLOSE`] in magnitude are rejected.

use crate::domain::bar::RawBar;
use crate::domain::error::CrossError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Keeps window sums and trade P/L well inside the `Decimal` range.
pub const MAX_CLOSE: Decimal = dec!(1000000000000000);

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    close: usize,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn locate_columns(headers: &csv::StringRecord) -> Result<Columns, CrossError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let date = find("date").ok_or_else(|| CrossError::Provider {
            reason: "missing Date column".into(),
        })?;
        let close = find("close")
            .or_else(|| find("adj close"))
            .ok_or_else(|| CrossError::Provider {
                reason: "missing Close column".into(),
            })?;

        Ok(Columns { date, close })
    }

    fn parse_date(value: &str) -> Result<NaiveDate, CrossError> {
        // Some exports carry a time component: "2024-01-15 00:00:00".
        let day = value.trim().split([' ', 'T']).next().unwrap_or_default();
        NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|e| CrossError::Provider {
            reason: format!("invalid date '{}': {}", value, e),
        })
    }

    fn parse_close(value: &str) -> Result<Option<Decimal>, CrossError> {
        let value = value.trim();
        if value.is_empty()
            || value.eq_ignore_ascii_case("null")
            || value.eq_ignore_ascii_case("nan")
        {
            return Ok(None);
        }
        let close = value
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(value))
            .map_err(|e| CrossError::Provider {
                reason: format!("invalid close value '{}': {}", value, e),
            })?;
        if close.abs() > MAX_CLOSE {
            return Err(CrossError::Provider {
                reason: format!("close value '{}' out of range", value),
            });
        }
        Ok(Some(close))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<RawBar>, CrossError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(CrossError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| CrossError::Provider {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| CrossError::Provider {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Self::locate_columns(headers)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| CrossError::Provider {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date = Self::parse_date(record.get(columns.date).unwrap_or_default())?;
            let close = Self::parse_close(record.get(columns.close).unwrap_or_default())?;
            bars.push(RawBar { date, close });
        }

        // Stable: rows sharing a date keep their file order.
        bars.sort_by_key(|b| b.date);
        debug!(symbol, rows = bars.len(), path = %path.display(), "read price file");
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RawBar>, CrossError> {
        let bars = self
            .read_all(symbol)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date < end_date)
            .collect();
        Ok(bars)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossError> {
        let bars = match self.read_all(symbol) {
            Ok(bars) => bars,
            Err(CrossError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
