use chrono::NaiveDate;
use log::{debug, warn};

use crate::{
    data::history::PriceHistory,
    ds::CloseSource,
    error::{GnError, GnResult},
    ticker::Ticker,
};

/// Fetches the daily closes of `tickers` over `[date_from, date_to]` into one table.
///
/// Tickers the source has no series for, or rejects on their own, are left out
/// with a warning. Transport failures and server-side statuses abort the fetch,
/// as does a source that returns nothing for any ticker.
pub async fn fetch_price_history(
    source: &dyn CloseSource,
    tickers: &[Ticker],
    date_from: &NaiveDate,
    date_to: &NaiveDate,
) -> GnResult<PriceHistory> {
    if tickers.is_empty() {
        return Err(GnError::Invalid {
            code: "EMPTY_TICKERS",
            message: "At least one ticker is required".to_string(),
        });
    }

    let mut series: Vec<(Ticker, Vec<(NaiveDate, f64)>)> = Vec::with_capacity(tickers.len());
    let mut missing: Vec<&Ticker> = vec![];

    for ticker in tickers {
        match source.fetch_closes(ticker, date_from, date_to).await {
            Ok(Some(closes)) if !closes.is_empty() => {
                debug!("[{ticker}] {} closes", closes.len());
                series.push((ticker.clone(), closes));
            }
            Ok(_) => {
                warn!("Close price not found for {ticker}");
                missing.push(ticker);
            }
            Err(err) if err.is_series_unavailable() => {
                warn!("Close price not available for {ticker}: {err}");
                missing.push(ticker);
            }
            Err(err) => return Err(err),
        }
    }

    if series.is_empty() {
        return Err(GnError::NoData {
            code: "NO_PRICE_DATA",
            message: format!(
                "No close price for any of {} tickers between {date_from} and {date_to}",
                tickers.len()
            ),
        });
    }

    if !missing.is_empty() {
        debug!("{} of {} tickers without closes", missing.len(), tickers.len());
    }

    PriceHistory::from_closes(series)
}
