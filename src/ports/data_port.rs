//! Price history port trait.

use crate::domain::bar::RawBar;
use crate::domain::error::CrossError;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily closes for `symbol` with `start_date <= date < end_date`, oldest first.
    ///
    /// Rows may repeat a date or lack a close; cleaning is the caller's job.
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RawBar>, CrossError>;

    /// First date, last date and row count held for `symbol`.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossError>;
}
