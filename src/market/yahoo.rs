//! # Yahoo Finance Provider
//!
//! $$
//! p_t = \text{AdjClose}_t
//! $$
//!
//! Live daily adjusted-close retrieval. Optional; enable the `yahoo` feature.

use chrono::Duration;
use chrono::NaiveDate;
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api::YahooConnector;

use crate::error::PortfolioError;
use crate::market::provider::InstrumentQuotes;
use crate::market::provider::PriceProvider;
use crate::market::provider::Sampling;

/// Blocking Yahoo Finance client returning dividend/split adjusted closes.
pub struct YahooProvider {
  connector: YahooConnector,
}

impl YahooProvider {
  pub fn new() -> Result<Self, PortfolioError> {
    let connector =
      YahooConnector::new().map_err(|e| PortfolioError::Retrieval(e.to_string()))?;
    Ok(Self { connector })
  }
}

impl PriceProvider for YahooProvider {
  fn fetch(
    &self,
    instruments: &[String],
    lookback: Duration,
    sampling: Sampling,
  ) -> Result<Vec<InstrumentQuotes>, PortfolioError> {
    // Only daily sampling exists; the match keeps the contract explicit.
    let Sampling::Daily = sampling;

    let end = OffsetDateTime::now_utc();
    let start = end - time::Duration::seconds(lookback.num_seconds());

    let mut out = Vec::with_capacity(instruments.len());
    for symbol in instruments {
      let response = self
        .connector
        .get_quote_history(symbol, start, end)
        .map_err(|e| PortfolioError::Retrieval(format!("{symbol}: {e}")))?;
      let quotes = response
        .quotes()
        .map_err(|e| PortfolioError::Retrieval(format!("{symbol}: {e}")))?;

      let mut points = Vec::with_capacity(quotes.len());
      for quote in &quotes {
        let ts = OffsetDateTime::from_unix_timestamp(quote.timestamp as i64)
          .map_err(|e| PortfolioError::Retrieval(format!("{symbol}: bad timestamp: {e}")))?;
        let date = ts.date();
        let date = NaiveDate::from_ymd_opt(date.year(), date.month() as u32, date.day() as u32)
          .ok_or_else(|| {
            PortfolioError::Retrieval(format!("{symbol}: unrepresentable date {date}"))
          })?;
        points.push((date, quote.adjclose));
      }

      debug!(symbol = symbol.as_str(), rows = points.len(), "fetched quotes");
      out.push(InstrumentQuotes {
        symbol: symbol.clone(),
        points,
      });
    }

    Ok(out)
  }
}
