use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;

use crate::{error::GnResult, ticker::Ticker};

pub static DATE_COLUMN: &str = "date";

/// Daily closes indexed by date, one nullable column per ticker.
///
/// Rows are sorted ascending by date and each ticker owns exactly one column,
/// so a (date, ticker) pair holds at most one price. Ticker columns are named
/// by the upper-cased symbol and never collide with [`DATE_COLUMN`].
#[derive(Clone, Debug)]
pub struct PriceHistory {
    df: DataFrame,
    tickers: Vec<Ticker>,
}

impl PriceHistory {
    /// Builds the table from per-ticker close series.
    ///
    /// Tickers without a single finite close get no column. A ticker listed
    /// twice keeps its first series; a date listed twice in one series keeps
    /// the later price.
    pub fn from_closes(series: Vec<(Ticker, Vec<(NaiveDate, f64)>)>) -> GnResult<Self> {
        let mut tickers: Vec<Ticker> = vec![];
        let mut closes: Vec<BTreeMap<NaiveDate, f64>> = vec![];
        let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

        for (ticker, values) in series {
            if tickers.contains(&ticker) {
                debug!("[{ticker}] Duplicated series ignored");
                continue;
            }

            let ticker_closes: BTreeMap<NaiveDate, f64> = values
                .into_iter()
                .filter(|(_, price)| price.is_finite())
                .collect();
            if ticker_closes.is_empty() {
                continue;
            }

            dates.extend(ticker_closes.keys().copied());
            tickers.push(ticker);
            closes.push(ticker_closes);
        }

        let mut columns: Vec<Column> = Vec::with_capacity(tickers.len() + 1);

        let date_values: Vec<AnyValue> = dates
            .iter()
            .map(|date| AnyValue::Date(date.to_epoch_days()))
            .collect();
        columns.push(Column::new(DATE_COLUMN.into(), date_values));

        for (ticker, ticker_closes) in tickers.iter().zip(closes.iter()) {
            let values: Vec<Option<f64>> = dates
                .iter()
                .map(|date| ticker_closes.get(date).copied())
                .collect();
            columns.push(Column::new(ticker.to_string().into(), values));
        }

        let df = DataFrame::new(columns)?;

        Ok(Self { df, tickers })
    }

    /// Tickers in column order
    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty() || self.df.height() == 0
    }

    pub fn get_dates(&self) -> Vec<NaiveDate> {
        let mut dates = vec![];

        if let Ok(col_date) = self.df.column(DATE_COLUMN) {
            for i in 0..col_date.len() {
                if let Ok(cell_date) = col_date.get(i) {
                    if let Some(date_days_after_epoch) = cell_date.extract::<i32>() {
                        if let Some(date) = NaiveDate::from_epoch_days(date_days_after_epoch) {
                            dates.push(date);
                        }
                    }
                }
            }
        }

        dates
    }

    /// Rows within `[date_from, date_to]`, all columns kept
    pub fn slice(&self, date_from: &NaiveDate, date_to: &NaiveDate) -> GnResult<Self> {
        if self.is_empty() || date_from > date_to {
            return Ok(Self {
                df: self.df.clear(),
                tickers: self.tickers.clone(),
            });
        }

        let df = self
            .df
            .clone()
            .lazy()
            .filter(
                col(DATE_COLUMN)
                    .gt_eq(lit(*date_from))
                    .and(col(DATE_COLUMN).lt_eq(lit(*date_to))),
            )
            .collect()?;

        Ok(Self {
            df,
            tickers: self.tickers.clone(),
        })
    }

    /// Non-null closes of one ticker in date order
    pub fn get_values(&self, ticker: &Ticker) -> Vec<(NaiveDate, f64)> {
        let mut vals = vec![];

        if let (Ok(col_date), Ok(col_val)) = (
            self.df.column(DATE_COLUMN),
            self.df.column(&ticker.to_string()),
        ) {
            for i in 0..col_date.len() {
                if let (Ok(cell_date), Ok(cell_val)) = (col_date.get(i), col_val.get(i)) {
                    if let (Some(date_days_after_epoch), Some(val)) =
                        (cell_date.extract::<i32>(), cell_val.extract::<f64>())
                    {
                        if let Some(date) = NaiveDate::from_epoch_days(date_days_after_epoch) {
                            vals.push((date, val));
                        }
                    }
                }
            }
        }

        vals
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn t(s: &str) -> Ticker {
        Ticker::from_str(s).unwrap()
    }

    #[test]
    fn test_from_closes_unions_dates() {
        let history = PriceHistory::from_closes(vec![
            (t("AAA.NS"), vec![(d(3), 10.0), (d(1), 9.0)]),
            (t("BBB.NS"), vec![(d(2), 20.0), (d(3), 21.0)]),
        ])
        .unwrap();

        assert_eq!(history.len(), 3);
        assert_eq!(history.get_dates(), vec![d(1), d(2), d(3)]);
        assert_eq!(
            history.get_values(&t("AAA.NS")),
            vec![(d(1), 9.0), (d(3), 10.0)]
        );
        assert_eq!(
            history.get_values(&t("BBB.NS")),
            vec![(d(2), 20.0), (d(3), 21.0)]
        );
    }

    #[test]
    fn test_from_closes_drops_empty_and_duplicated_series() {
        let history = PriceHistory::from_closes(vec![
            (t("AAA.NS"), vec![(d(1), 1.0)]),
            (t("EMPTY.NS"), vec![]),
            (t("NAN.NS"), vec![(d(1), f64::NAN)]),
            (t("AAA.NS"), vec![(d(2), 2.0)]),
        ])
        .unwrap();

        assert_eq!(history.tickers(), &[t("AAA.NS")]);
        assert_eq!(history.get_dates(), vec![d(1)]);
        assert!(history.get_values(&t("EMPTY.NS")).is_empty());
    }

    #[test]
    fn test_from_closes_keeps_one_price_per_date() {
        let history =
            PriceHistory::from_closes(vec![(t("AAA.NS"), vec![(d(1), 1.0), (d(1), 1.5)])])
                .unwrap();

        assert_eq!(history.get_values(&t("AAA.NS")), vec![(d(1), 1.5)]);
    }

    #[test]
    fn test_empty_history() {
        let history = PriceHistory::from_closes(vec![]).unwrap();
        assert!(history.is_empty());
        assert!(history.tickers().is_empty());

        let sliced = history.slice(&d(1), &d(31)).unwrap();
        assert!(sliced.is_empty());
    }

    #[test]
    fn test_slice_is_inclusive() {
        let history = PriceHistory::from_closes(vec![(
            t("AAA.NS"),
            (1..=10).map(|day| (d(day), day as f64)).collect(),
        )])
        .unwrap();

        let sliced = history.slice(&d(3), &d(5)).unwrap();
        assert_eq!(sliced.get_dates(), vec![d(3), d(4), d(5)]);
        assert_eq!(sliced.tickers(), history.tickers());
        assert_eq!(
            sliced.get_values(&t("AAA.NS")).last(),
            Some(&(d(5), 5.0))
        );

        let sliced = history.slice(&d(20), &d(25)).unwrap();
        assert_eq!(sliced.len(), 0);
        assert!(sliced.get_values(&t("AAA.NS")).is_empty());

        let sliced = history.slice(&d(5), &d(3)).unwrap();
        assert_eq!(sliced.len(), 0);
    }
}
