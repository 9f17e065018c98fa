//! Clean price series and the preprocessing that produces it.
//!
//! `clean` turns a provider's raw rows into a [`Series`]:
//! - rows repeating an earlier date are dropped (first occurrence wins)
//! - missing closes are forward-filled from the last known close
//! - an empty input, a missing first close, or out-of-order dates are errors

use crate::domain::bar::{Bar, RawBar};
use crate::domain::error::CrossError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Ordered, duplicate-free, gap-free daily closes for one symbol.
#[derive(Debug, Clone)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
    date_index: HashMap<NaiveDate, usize>,
}

impl Series {
    fn from_ordered(symbol: String, bars: Vec<Bar>) -> Self {
        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();
        Self {
            symbol,
            bars,
            date_index,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

/// Deduplicate and forward-fill raw provider rows into a [`Series`].
pub fn clean(symbol: &str, raw: Vec<RawBar>) -> Result<Series, CrossError> {
    if raw.is_empty() {
        return Err(CrossError::data(symbol, "price series is empty"));
    }

    let total = raw.len();
    let mut seen: HashSet<NaiveDate> = HashSet::with_capacity(total);
    let unique: Vec<RawBar> = raw.into_iter().filter(|r| seen.insert(r.date)).collect();
    let duplicates = total - unique.len();
    if duplicates > 0 {
        info!(symbol, duplicates, "dropped duplicate dates");
    }

    if let Some(pair) = unique.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(CrossError::data(
            symbol,
            format!("dates out of order: {} follows {}", pair[1].date, pair[0].date),
        ));
    }

    let mut bars = Vec::with_capacity(unique.len());
    let mut last_close: Option<Decimal> = None;
    let mut filled = 0usize;

    for row in unique {
        let close = match (row.close, last_close) {
            (Some(close), _) => close,
            (None, Some(prev)) => {
                filled += 1;
                debug!(symbol, date = %row.date, close = %prev, "forward-filled close");
                prev
            }
            (None, None) => {
                return Err(CrossError::data(
                    symbol,
                    format!("first close on {} is missing and cannot be filled", row.date),
                ));
            }
        };
        last_close = Some(close);
        bars.push(Bar {
            date: row.date,
            close,
        });
    }

    if filled > 0 {
        info!(symbol, filled, "forward-filled missing closes");
    }

    Ok(Series::from_ordered(symbol.to_string(), bars))
}
