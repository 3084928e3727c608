use chrono::NaiveDate;

pub type GnResult<T> = Result<T, GnError>;

#[derive(Debug, thiserror::Error)]
pub enum GnError {
    #[error("[Dataframe Error] {0}")]
    DataframeError(#[from] ::polars::error::PolarsError),

    #[error("[HTTP Request Error] {0}")]
    HttpRequestError(#[from] ::reqwest::Error),

    #[error("[HTTP Middleware Error] {0}")]
    HttpMiddlewareError(#[from] ::reqwest_middleware::Error),

    #[error("[HTTP Status Error] [{request}] {status}")]
    HttpStatusError {
        code: u16,
        status: String,
        request: String,
    },

    #[error("[Invalid] {message}")]
    Invalid { code: &'static str, message: String },

    #[error("[IO Error] {0}")]
    IoError(#[from] std::io::Error),

    #[error("[No Data] {message}")]
    NoData { code: &'static str, message: String },

    #[error("[Parse Config Error] {0}")]
    ParseConfigError(#[from] ::confy::ConfyError),

    #[error("[Parse DataTime Error] {0}")]
    ParseDataTimeError(#[from] chrono::ParseError),

    #[error("[Parse Enum Error] {0}")]
    ParseEnumError(#[from] ::strum::ParseError),

    #[error("[Parse URL Error] {0}")]
    ParseUrlError(#[from] url::ParseError),

    #[error("[Serde JSON Error] {0}")]
    SerdeJsonError(#[from] ::serde_json::Error),

    #[error("[Zero Price] {ticker} closed at 0 on {date}")]
    ZeroPrice { ticker: String, date: NaiveDate },
}

impl GnError {
    /// Failures confined to one requested series, as opposed to the source itself
    pub fn is_series_unavailable(&self) -> bool {
        match self {
            Self::HttpStatusError { code, .. } => (400..500).contains(code) && *code != 429,
            Self::SerdeJsonError(_) => true,
            _ => false,
        }
    }
}
