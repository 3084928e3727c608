use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;

use crate::{
    config::ZeroPricePolicy,
    data::history::PriceHistory,
    error::{GnError, GnResult},
    ticker::Ticker,
    utils::{datetime::window_start, financial::calc_return_pct, math::round_to},
};

pub const DEFAULT_WINDOW_DAYS: u32 = 30;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickerReturn {
    pub ticker: Ticker,
    /// Percent, rounded to 2 decimals
    pub return_pct: f64,
}

/// Trailing-window return scanner over a [`PriceHistory`]
#[derive(Clone, Debug)]
pub struct ReturnScanner {
    pub window_days: u32,
    pub zero_price_policy: ZeroPricePolicy,
}

impl Default for ReturnScanner {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            zero_price_policy: ZeroPricePolicy::default(),
        }
    }
}

impl ReturnScanner {
    pub fn new(window_days: u32, zero_price_policy: ZeroPricePolicy) -> Self {
        Self {
            window_days,
            zero_price_policy,
        }
    }

    /// Tickers whose close rose over `[reference_date - window_days, reference_date]`.
    ///
    /// Each column is measured from its earliest to its latest non-null close in
    /// the window; columns with fewer than 2 closes are left out. Only strictly
    /// positive returns are kept, in column order.
    pub fn scan(
        &self,
        history: &PriceHistory,
        reference_date: &NaiveDate,
    ) -> GnResult<Vec<TickerReturn>> {
        let date_from = window_start(reference_date, self.window_days);
        let window = history.slice(&date_from, reference_date)?;

        let mut results: Vec<TickerReturn> = vec![];

        for ticker in window.tickers() {
            let prices = window.get_values(ticker);

            let (Some((first_date, first)), Some((_, last))) = (prices.first(), prices.last())
            else {
                continue;
            };
            if prices.len() < 2 {
                debug!("[{ticker}] Insufficient closes in window");
                continue;
            }

            let Some(return_pct) = calc_return_pct(*first, *last) else {
                match self.zero_price_policy {
                    ZeroPricePolicy::Error => {
                        return Err(GnError::ZeroPrice {
                            ticker: ticker.to_string(),
                            date: *first_date,
                        });
                    }
                    ZeroPricePolicy::Skip => {
                        warn!("Zero close price for {ticker} on {first_date}, skipped");
                        continue;
                    }
                }
            };

            if return_pct > 0.0 {
                results.push(TickerReturn {
                    ticker: ticker.clone(),
                    return_pct: round_to(return_pct, 2),
                });
            }
        }

        Ok(results)
    }
}

/// Positive 30-day returns ending at `reference_date`
pub fn positive_returns(
    history: &PriceHistory,
    reference_date: &NaiveDate,
) -> GnResult<Vec<TickerReturn>> {
    ReturnScanner::default().scan(history, reference_date)
}
