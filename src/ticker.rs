use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{GnError, GnResult};

/// Exchange-qualified symbol as understood by the price source, e.g. `RELIANCE.NS`
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker {
    pub symbol: String,
    pub exchange: Option<String>,
}

impl FromStr for Ticker {
    type Err = GnError;
    fn from_str(s: &str) -> Result<Self, <Self as FromStr>::Err> {
        let s = s.trim();

        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(GnError::Invalid {
                code: "INVALID_TICKER",
                message: format!("Invalid ticker '{s}'"),
            });
        }

        if let Some((symbol, exchange)) = s.rsplit_once('.') {
            if symbol.is_empty() || exchange.is_empty() {
                return Err(GnError::Invalid {
                    code: "INVALID_TICKER",
                    message: format!("Invalid ticker '{s}'"),
                });
            }

            Ok(Self {
                symbol: symbol.to_uppercase(),
                exchange: Some(exchange.to_uppercase()),
            })
        } else {
            Ok(Self {
                symbol: s.to_uppercase(),
                exchange: None,
            })
        }
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.exchange {
            Some(exchange) => write!(f, "{}.{}", self.symbol, exchange),
            None => write!(f, "{}", self.symbol),
        }
    }
}

impl TryFrom<String> for Ticker {
    type Error = GnError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.to_string()
    }
}

/// Parses and deduplicates tickers, keeping the order of first occurrence
pub fn parse_tickers<S: AsRef<str>>(items: &[S]) -> GnResult<Vec<Ticker>> {
    let mut tickers: Vec<Ticker> = Vec::with_capacity(items.len());

    for item in items {
        let ticker = Ticker::from_str(item.as_ref())?;
        if !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }

    if tickers.is_empty() {
        return Err(GnError::Invalid {
            code: "EMPTY_TICKERS",
            message: "At least one ticker is required".to_string(),
        });
    }

    Ok(tickers)
}

/// Nifty 50 constituents queried when no basket is configured
pub const NIFTY_50: &[&str] = &[
    "RELIANCE.NS",
    "TCS.NS",
    "HDFCBANK.NS",
    "HINDUNILVR.NS",
    "INFY.NS",
    "KOTAKBANK.NS",
    "ICICIBANK.NS",
    "SBIN.NS",
    "BAJFINANCE.NS",
    "BHARTIARTL.NS",
    "MARUTI.NS",
    "LT.NS",
    "WIPRO.NS",
    "AXISBANK.NS",
    "TECHM.NS",
    "NESTLEIND.NS",
    "ONGC.NS",
    "POWERGRID.NS",
    "NTPC.NS",
    "SUNPHARMA.NS",
    "ULTRACEMCO.NS",
    "TATAMOTORS.NS",
    "IOC.NS",
    "JSWSTEEL.NS",
    "DRREDDY.NS",
    "INDUSINDBK.NS",
    "COALINDIA.NS",
    "BAJAJ-AUTO.NS",
    "TITAN.NS",
    "M&M.NS",
    "UPL.NS",
    "GRASIM.NS",
    "HEROMOTOCO.NS",
    "SHREECEM.NS",
    "ASIANPAINT.NS",
    "SBILIFE.NS",
    "BRITANNIA.NS",
    "DIVISLAB.NS",
    "CIPLA.NS",
    "ADANIPORTS.NS",
    "BAJAJFINSV.NS",
    "HCLTECH.NS",
    "TATACONSUM.NS",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_from_str() {
        let ticker = Ticker::from_str(" reliance.ns ").unwrap();
        assert_eq!(ticker.symbol, "RELIANCE");
        assert_eq!(ticker.exchange.as_deref(), Some("NS"));
        assert_eq!(ticker.to_string(), "RELIANCE.NS");

        let ticker = Ticker::from_str("AAPL").unwrap();
        assert_eq!(ticker.exchange, None);
        assert_eq!(ticker.to_string(), "AAPL");

        assert_eq!(Ticker::from_str("M&M.NS").unwrap().to_string(), "M&M.NS");
        assert!(Ticker::from_str("").is_err());
        assert!(Ticker::from_str(".NS").is_err());
        assert!(Ticker::from_str("TCS.").is_err());
        assert!(Ticker::from_str("TC S.NS").is_err());
    }

    #[test]
    fn test_parse_tickers() {
        let tickers = parse_tickers(&["TCS.NS", "INFY.NS", "tcs.ns", "IOC.NS", "INFY.NS"]).unwrap();
        let names: Vec<String> = tickers.iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["TCS.NS", "INFY.NS", "IOC.NS"]);

        let empty: [&str; 0] = [];
        assert!(parse_tickers(&empty).is_err());
    }

    #[test]
    fn test_nifty_50_is_unique() {
        let tickers = parse_tickers(NIFTY_50).unwrap();
        assert_eq!(tickers.len(), NIFTY_50.len());
    }
}
