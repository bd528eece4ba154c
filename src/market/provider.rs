//! # Price Providers
//!
//! $$
//! \text{fetch}:(\text{symbols},\ \text{lookback},\ \text{sampling})\to\{(t_k,p_k)\}
//! $$
//!
//! Capability boundary for price retrieval. The pipeline only ever sees raw
//! quote rows; alignment happens in [`crate::market::table::PriceTable`].

use chrono::Duration;
use chrono::NaiveDate;

use crate::error::PortfolioError;

/// Sampling frequency of the requested history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sampling {
  #[default]
  Daily,
}

/// Raw adjusted-close history for one instrument, possibly misaligned with
/// the rest of the basket.
#[derive(Clone, Debug, PartialEq)]
pub struct InstrumentQuotes {
  pub symbol: String,
  pub points: Vec<(NaiveDate, f64)>,
}

/// External source of daily price history.
///
/// Retrieval is a single blocking call per request; the computation core
/// never performs I/O itself. Implementations must return one entry per
/// requested symbol, in request order.
pub trait PriceProvider {
  fn fetch(
    &self,
    instruments: &[String],
    lookback: Duration,
    sampling: Sampling,
  ) -> Result<Vec<InstrumentQuotes>, PortfolioError>;
}

/// Deterministic in-memory provider for tests and offline runs.
#[derive(Clone, Debug, Default)]
pub struct FixtureProvider {
  quotes: Vec<InstrumentQuotes>,
}

impl FixtureProvider {
  pub fn new(quotes: Vec<InstrumentQuotes>) -> Self {
    Self { quotes }
  }
}

impl PriceProvider for FixtureProvider {
  fn fetch(
    &self,
    instruments: &[String],
    _lookback: Duration,
    _sampling: Sampling,
  ) -> Result<Vec<InstrumentQuotes>, PortfolioError> {
    instruments
      .iter()
      .map(|symbol| {
        self
          .quotes
          .iter()
          .find(|q| &q.symbol == symbol)
          .cloned()
          .ok_or_else(|| PortfolioError::Retrieval(format!("no fixture data for {symbol}")))
      })
      .collect()
  }
}
