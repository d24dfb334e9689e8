//! Price data access port trait.

use chrono::NaiveDate;

use crate::domain::error::StratbenchError;
use crate::domain::price_series::PriceSeries;

pub trait DataPort {
    /// Bars for `ticker` within the inclusive, optional date bounds.
    ///
    /// An empty result is `StratbenchError::NoData`.
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, StratbenchError>;

    /// Tickers this source can serve, sorted.
    fn list_tickers(&self) -> Result<Vec<String>, StratbenchError>;
}
