use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use fake_user_agent::get_rua;
use log::debug;
use rand::Rng;
use serde::Deserialize;
use tokio::time::sleep;

use crate::{
    config::ScanConfig,
    ds::CloseSource,
    error::{GnError, GnResult},
    ticker::Ticker,
    utils::{
        datetime::{date_from_timestamp, date_to_timestamp},
        net::http_get,
    },
};

static CHART_PATH: &str = "/v8/finance/chart";
static PROBE_SYMBOL: &str = "^NSEI";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "gmtoffset", default)]
    gmt_offset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

/// Yahoo Finance chart endpoint
pub struct YahooSource {
    api: String,
    request_delay_secs: f64,
    timeout_secs: u64,
    max_retries: u32,
}

impl YahooSource {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            api: config.yahoo_api.clone(),
            request_delay_secs: config.request_delay_secs,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        }
    }

    async fn call_chart_api(
        &self,
        symbol: &str,
        query: &HashMap<String, String>,
    ) -> GnResult<Option<Vec<u8>>> {
        if self.request_delay_secs > 0.0 {
            let secs = self.request_delay_secs * rand::rng().random_range(0.67..=1.33);
            sleep(tokio::time::Duration::from_secs_f64(secs)).await;
        }

        let mut headers: HashMap<String, String> = HashMap::new();
        headers.insert(
            reqwest::header::USER_AGENT.to_string(),
            get_rua().to_string(),
        );

        let path = format!("{CHART_PATH}/{symbol}");
        match http_get(
            &self.api,
            Some(&path),
            query,
            &headers,
            self.timeout_secs,
            self.max_retries,
        )
        .await
        {
            Ok(bytes) => Ok(Some(bytes)),
            Err(GnError::HttpStatusError { code: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl CloseSource for YahooSource {
    async fn fetch_closes(
        &self,
        ticker: &Ticker,
        date_from: &NaiveDate,
        date_to: &NaiveDate,
    ) -> GnResult<Option<Vec<(NaiveDate, f64)>>> {
        let mut query: HashMap<String, String> = HashMap::new();
        query.insert("period1".to_string(), date_to_timestamp(date_from).to_string());
        query.insert(
            "period2".to_string(),
            date_to_timestamp(&(*date_to + Duration::days(1))).to_string(),
        );
        query.insert("interval".to_string(), "1d".to_string());
        query.insert("events".to_string(), "history".to_string());

        match self.call_chart_api(&ticker.to_string(), &query).await? {
            Some(bytes) => {
                let closes = parse_chart_closes(&bytes)?;
                Ok(closes.map(|closes| {
                    closes
                        .into_iter()
                        .filter(|(date, _)| date >= date_from && date <= date_to)
                        .collect()
                }))
            }
            None => {
                debug!("[{ticker}] Chart not found");
                Ok(None)
            }
        }
    }

    async fn check(&self) -> GnResult<()> {
        let mut query: HashMap<String, String> = HashMap::new();
        query.insert("range".to_string(), "5d".to_string());
        query.insert("interval".to_string(), "1d".to_string());

        if let Some(bytes) = self.call_chart_api(PROBE_SYMBOL, &query).await? {
            if let Some(closes) = parse_chart_closes(&bytes)? {
                if !closes.is_empty() {
                    return Ok(());
                }
            }
        }

        Err(GnError::Invalid {
            code: "INVALID_RESPONSE",
            message: "Invalid response".to_string(),
        })
    }
}

/// Decodes the close series of a chart payload, `None` when the payload carries no series
fn parse_chart_closes(bytes: &[u8]) -> GnResult<Option<Vec<(NaiveDate, f64)>>> {
    let response: ChartResponse = serde_json::from_slice(bytes)?;

    if let Some(error) = response.chart.error {
        debug!("[Chart Error] {}: {}", error.code, error.description);
        return Ok(None);
    }

    let Some(data) = response
        .chart
        .result
        .and_then(|result| result.into_iter().next())
    else {
        return Ok(None);
    };

    let (Some(timestamps), Some(quote)) = (data.timestamp, data.indicators.quote.first()) else {
        return Ok(None);
    };

    let mut closes: Vec<(NaiveDate, f64)> = Vec::with_capacity(timestamps.len());
    for (i, timestamp) in timestamps.iter().enumerate() {
        if let Some(Some(close)) = quote.close.get(i) {
            if let Some(date) = date_from_timestamp(*timestamp, data.meta.gmt_offset) {
                closes.push((date, *close));
            }
        }
    }

    if closes.is_empty() {
        Ok(None)
    } else {
        Ok(Some(closes))
    }
}
