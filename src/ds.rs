use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{error::GnResult, ticker::Ticker};

pub mod yahoo;

/// Remote source of daily close prices
#[async_trait]
pub trait CloseSource: Send + Sync {
    /// Closes of `ticker` within `[date_from, date_to]`, `None` if the source has no series for it
    async fn fetch_closes(
        &self,
        ticker: &Ticker,
        date_from: &NaiveDate,
        date_to: &NaiveDate,
    ) -> GnResult<Option<Vec<(NaiveDate, f64)>>>;

    async fn check(&self) -> GnResult<()>;
}
