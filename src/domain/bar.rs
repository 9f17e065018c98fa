//! Daily price bars.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A cleaned daily bar: one per trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// A bar as delivered by a data provider, before preprocessing.
///
/// `close` is `None` when the provider had no value for that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBar {
    pub date: NaiveDate,
    pub close: Option<Decimal>,
}

impl RawBar {
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            close: Some(close),
        }
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self { date, close: None }
    }
}
