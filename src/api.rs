use std::time::Duration;

use chrono::{Local, NaiveDate};
use log::{debug, info};
use serde::Serialize;

use crate::{
    cache::{HistoryCache, HistoryKey},
    config::ScanConfig,
    data::history::PriceHistory,
    ds::{CloseSource, yahoo::YahooSource},
    error::{GnError, GnResult},
    financial::fetch_price_history,
    scan::{ReturnScanner, TickerReturn},
    ticker::Ticker,
    utils::datetime::{date_from_str, window_start},
};

/// Outcome of one analysis request
#[derive(Clone, Debug, Serialize)]
pub struct ScanReport {
    pub input_date: String,
    pub reference_date: NaiveDate,
    pub window_start: NaiveDate,
    pub stocks: Vec<TickerReturn>,
}

/// Request handler wiring the price source, the history cache and the scanner
pub struct Analyzer {
    tickers: Vec<Ticker>,
    anchor_date: NaiveDate,
    scanner: ReturnScanner,
    source: Box<dyn CloseSource>,
    cache: HistoryCache,
}

impl Analyzer {
    pub fn new(config: &ScanConfig) -> GnResult<Self> {
        Self::with_source(config, Box::new(YahooSource::new(config)))
    }

    pub fn with_source(config: &ScanConfig, source: Box<dyn CloseSource>) -> GnResult<Self> {
        Ok(Self {
            tickers: config.parsed_tickers()?,
            anchor_date: config.anchor_date()?,
            scanner: ReturnScanner::new(config.window_days, config.zero_price_policy),
            source,
            cache: HistoryCache::new(Duration::from_secs(config.cache_ttl_secs)),
        })
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    /// History from the anchor date up to `date_to`, served from cache while fresh
    pub async fn history(&self, date_to: &NaiveDate) -> GnResult<PriceHistory> {
        if *date_to < self.anchor_date {
            return Err(GnError::Invalid {
                code: "INVALID_DATE_RANGE",
                message: format!(
                    "The end date {date_to} cannot be earlier than the anchor date {}",
                    self.anchor_date
                ),
            });
        }

        let key = HistoryKey::new(&self.tickers, &self.anchor_date, date_to);
        if let Some(history) = self.cache.get(&key) {
            return Ok(history);
        }

        let history =
            fetch_price_history(self.source.as_ref(), &self.tickers, &self.anchor_date, date_to)
                .await?;
        info!(
            "Fetched {} tickers over {} trading days",
            history.tickers().len(),
            history.len()
        );
        self.cache.upsert(key, &history);

        Ok(history)
    }

    /// Tickers with a positive trailing return ending at `input_date`, using history up to today
    pub async fn analyze(&self, input_date: &str) -> GnResult<ScanReport> {
        self.analyze_until(input_date, &Local::now().date_naive())
            .await
    }

    pub async fn analyze_until(&self, input_date: &str, date_to: &NaiveDate) -> GnResult<ScanReport> {
        let reference_date = date_from_str(input_date)?;
        debug!("Analyze {reference_date} with history until {date_to}");

        let history = self.history(date_to).await?;
        let stocks = self.scanner.scan(&history, &reference_date)?;

        Ok(ScanReport {
            input_date: input_date.trim().to_string(),
            reference_date,
            window_start: window_start(&reference_date, self.scanner.window_days),
            stocks,
        })
    }

    pub async fn check(&self) -> Vec<(String, Option<GnError>)> {
        let mut status: Vec<(String, Option<GnError>)> = vec![];

        status.push(("Price Source".to_string(), self.source.check().await.err()));

        status
    }
}

pub fn get_config() -> GnResult<ScanConfig> {
    ScanConfig::load()
}

pub fn set_config(key: &str, value: &str) -> GnResult<ScanConfig> {
    let mut config = ScanConfig::load()?;
    config.set(key, value)?;
    config.store()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::{config::ZeroPricePolicy, financial::tests::FakeSource};

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn config(tickers: &[&str]) -> ScanConfig {
        ScanConfig {
            tickers: tickers.iter().map(|s| s.to_string()).collect(),
            anchor_date: "2024-01-01".to_string(),
            ..Default::default()
        }
    }

    fn source() -> FakeSource {
        FakeSource::with(&[
            ("T1.NS", vec![(d(1, 1), 100.0), (d(1, 30), 110.0)]),
            ("T2.NS", vec![(d(1, 1), 100.0), (d(1, 30), 90.0)]),
            ("T3.NS", vec![(d(1, 1), 100.0)]),
        ])
    }

    #[tokio::test]
    async fn test_analyze() {
        let analyzer = Analyzer::with_source(
            &config(&["T1.NS", "T2.NS", "T3.NS", "T4.NS"]),
            Box::new(source()),
        )
        .unwrap();

        let report = analyzer
            .analyze_until(" 2024-01-30 ", &d(2, 15))
            .await
            .unwrap();

        assert_eq!(report.input_date, "2024-01-30");
        assert_eq!(report.reference_date, d(1, 30));
        assert_eq!(
            report.window_start,
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
        assert_eq!(report.stocks.len(), 1);
        assert_eq!(report.stocks[0].ticker.to_string(), "T1.NS");
        assert_eq!(report.stocks[0].return_pct, 10.0);
    }

    #[tokio::test]
    async fn test_analyze_before_data() {
        let analyzer =
            Analyzer::with_source(&config(&["T1.NS"]), Box::new(source())).unwrap();

        let report = analyzer
            .analyze_until("2023-06-01", &d(2, 15))
            .await
            .unwrap();
        assert!(report.stocks.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_rejects_invalid_date() {
        let analyzer =
            Analyzer::with_source(&config(&["T1.NS"]), Box::new(source())).unwrap();

        let result = analyzer.analyze_until("30/01/2024", &d(2, 15)).await;
        assert!(matches!(result, Err(GnError::Invalid { code: "INVALID_DATE", .. })));
    }

    #[tokio::test]
    async fn test_analyze_reuses_cached_history() {
        let source = std::sync::Arc::new(source());

        struct Shared(std::sync::Arc<FakeSource>);

        #[async_trait::async_trait]
        impl CloseSource for Shared {
            async fn fetch_closes(
                &self,
                ticker: &Ticker,
                date_from: &NaiveDate,
                date_to: &NaiveDate,
            ) -> GnResult<Option<Vec<(NaiveDate, f64)>>> {
                self.0.fetch_closes(ticker, date_from, date_to).await
            }

            async fn check(&self) -> GnResult<()> {
                self.0.check().await
            }
        }

        let analyzer = Analyzer::with_source(
            &config(&["T1.NS", "T2.NS"]),
            Box::new(Shared(source.clone())),
        )
        .unwrap();

        analyzer.analyze_until("2024-01-30", &d(2, 15)).await.unwrap();
        analyzer.analyze_until("2024-01-15", &d(2, 15)).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        analyzer.analyze_until("2024-01-30", &d(2, 16)).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_analyze_propagates_zero_price() {
        let source = FakeSource::with(&[("Z.NS", vec![(d(1, 2), 0.0), (d(1, 3), 1.0)])]);

        let analyzer = Analyzer::with_source(&config(&["Z.NS"]), Box::new(source)).unwrap();
        let result = analyzer.analyze_until("2024-01-03", &d(1, 31)).await;
        assert!(matches!(result, Err(GnError::ZeroPrice { .. })));

        let source = FakeSource::with(&[("Z.NS", vec![(d(1, 2), 0.0), (d(1, 3), 1.0)])]);
        let config = ScanConfig {
            zero_price_policy: ZeroPricePolicy::Skip,
            ..config(&["Z.NS"])
        };
        let analyzer = Analyzer::with_source(&config, Box::new(source)).unwrap();
        let report = analyzer.analyze_until("2024-01-03", &d(1, 31)).await.unwrap();
        assert!(report.stocks.is_empty());
    }

    #[tokio::test]
    async fn test_history_before_anchor_is_invalid() {
        let analyzer =
            Analyzer::with_source(&config(&["T1.NS"]), Box::new(source())).unwrap();

        let result = analyzer.history(&d(1, 1).pred_opt().unwrap()).await;
        assert!(matches!(result, Err(GnError::Invalid { .. })));
    }

    #[tokio::test]
    async fn test_check() {
        let analyzer =
            Analyzer::with_source(&config(&["T1.NS"]), Box::new(source())).unwrap();
        let status = analyzer.check().await;
        assert_eq!(status.len(), 1);
        assert!(status[0].1.is_none());

        let unreachable = FakeSource {
            unreachable: true,
            ..Default::default()
        };
        let analyzer =
            Analyzer::with_source(&config(&["T1.NS"]), Box::new(unreachable)).unwrap();
        let status = analyzer.check().await;
        assert!(status[0].1.is_some());
    }
}
