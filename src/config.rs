use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::{GnError, GnResult},
    ticker::{NIFTY_50, Ticker, parse_tickers},
    utils::datetime::date_from_str,
};

pub static APP_NAME: &str = env!("CARGO_PKG_NAME");

/// What to do with a ticker whose first close in the window is zero
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ZeroPricePolicy {
    #[default]
    Error,
    Skip,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub tickers: Vec<String>,
    pub anchor_date: String,
    pub window_days: u32,
    pub yahoo_api: String,
    pub request_delay_secs: f64,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub zero_price_policy: ZeroPricePolicy,
    pub cache_ttl_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tickers: NIFTY_50.iter().map(|s| s.to_string()).collect(),
            anchor_date: "2020-01-01".to_string(),
            window_days: 30,
            yahoo_api: "https://query1.finance.yahoo.com".to_string(),
            request_delay_secs: 0.5,
            timeout_secs: 30,
            max_retries: 3,
            zero_price_policy: ZeroPricePolicy::Error,
            cache_ttl_secs: 300,
        }
    }
}

impl ScanConfig {
    pub fn load() -> GnResult<Self> {
        confy::load(APP_NAME, None).map_err(Into::into)
    }

    pub fn store(&self) -> GnResult<()> {
        confy::store(APP_NAME, None, self).map_err(Into::into)
    }

    pub fn anchor_date(&self) -> GnResult<NaiveDate> {
        date_from_str(&self.anchor_date)
    }

    pub fn parsed_tickers(&self) -> GnResult<Vec<Ticker>> {
        parse_tickers(&self.tickers)
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        vec![
            ("tickers".to_string(), self.tickers.join(",")),
            ("anchor_date".to_string(), self.anchor_date.clone()),
            ("window_days".to_string(), self.window_days.to_string()),
            ("yahoo_api".to_string(), self.yahoo_api.clone()),
            (
                "request_delay_secs".to_string(),
                self.request_delay_secs.to_string(),
            ),
            ("timeout_secs".to_string(), self.timeout_secs.to_string()),
            ("max_retries".to_string(), self.max_retries.to_string()),
            (
                "zero_price_policy".to_string(),
                self.zero_price_policy.to_string(),
            ),
            ("cache_ttl_secs".to_string(), self.cache_ttl_secs.to_string()),
        ]
    }

    /// Updates one entry by key, validating the value before it is accepted
    pub fn set(&mut self, key: &str, value: &str) -> GnResult<()> {
        let value = value.trim();

        match key.to_lowercase().as_str() {
            "tickers" => {
                let items: Vec<&str> = value.split(',').filter(|s| !s.trim().is_empty()).collect();
                self.tickers = parse_tickers(&items)?
                    .iter()
                    .map(|t| t.to_string())
                    .collect();
            }
            "anchor_date" => {
                let date = date_from_str(value)?;
                self.anchor_date = date.format("%Y-%m-%d").to_string();
            }
            "window_days" => self.window_days = parse_number(key, value)?,
            "yahoo_api" => {
                url::Url::parse(value)?;
                self.yahoo_api = value.to_string();
            }
            "request_delay_secs" => {
                let secs: f64 = parse_number(key, value)?;
                if !secs.is_finite() || secs < 0.0 {
                    return Err(GnError::Invalid {
                        code: "INVALID_CONFIG_VALUE",
                        message: format!("Invalid value '{value}' for '{key}'"),
                    });
                }
                self.request_delay_secs = secs;
            }
            "timeout_secs" => self.timeout_secs = parse_number(key, value)?,
            "max_retries" => self.max_retries = parse_number(key, value)?,
            "zero_price_policy" => self.zero_price_policy = ZeroPricePolicy::from_str(value)?,
            "cache_ttl_secs" => self.cache_ttl_secs = parse_number(key, value)?,
            _ => {
                return Err(GnError::Invalid {
                    code: "UNKNOWN_CONFIG_KEY",
                    message: format!("Unknown config key '{key}'"),
                });
            }
        }

        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> GnResult<T> {
    value.parse::<T>().map_err(|_| GnError::Invalid {
        code: "INVALID_CONFIG_VALUE",
        message: format!("Invalid value '{value}' for '{key}'"),
    })
}
