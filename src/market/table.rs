//! # Price Table
//!
//! $$
//! D = \bigcap_{i=1}^{n} D_i
//! $$
//!
//! Aligned per-instrument price history and portfolio weight validation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::PortfolioError;
use crate::market::provider::InstrumentQuotes;

/// Tolerance for the weight-sum-to-one invariant.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Daily adjusted prices for a fixed basket, aligned to one gap-free date
/// index. Dates where any instrument lacks a price are dropped during
/// construction (inner join); the table is immutable afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceTable {
  instruments: Vec<String>,
  dates: Vec<NaiveDate>,
  columns: Vec<Vec<f64>>,
}

impl PriceTable {
  /// Build an aligned table from raw per-instrument quote history.
  ///
  /// Keeps exactly the dates present for every instrument, sorted ascending.
  /// Duplicate quotes for one date keep the last observation. Fails with
  /// [`PortfolioError::DataUnavailable`] when the retrieval produced no rows
  /// and [`PortfolioError::AlignmentError`] when the instruments share no
  /// trading date.
  pub fn align(quotes: &[InstrumentQuotes]) -> Result<Self, PortfolioError> {
    if quotes.is_empty() || quotes.iter().all(|q| q.points.is_empty()) {
      return Err(PortfolioError::DataUnavailable);
    }

    let by_date: Vec<BTreeMap<NaiveDate, f64>> = quotes
      .iter()
      .map(|q| q.points.iter().copied().collect())
      .collect();

    let dates: Vec<NaiveDate> = by_date[0]
      .keys()
      .filter(|d| by_date[1..].iter().all(|m| m.contains_key(*d)))
      .copied()
      .collect();

    if dates.is_empty() {
      return Err(PortfolioError::AlignmentError);
    }

    let raw_rows = by_date.iter().map(|m| m.len()).max().unwrap_or(0);
    if dates.len() < raw_rows {
      debug!(
        kept = dates.len(),
        raw = raw_rows,
        "dropped incomplete rows during alignment"
      );
    }

    let columns = by_date
      .iter()
      .map(|m| dates.iter().map(|d| m[d]).collect())
      .collect();

    Ok(Self {
      instruments: quotes.iter().map(|q| q.symbol.clone()).collect(),
      dates,
      columns,
    })
  }

  /// Basket symbols in their fixed display order.
  pub fn instruments(&self) -> &[String] {
    &self.instruments
  }

  /// Shared gap-free date index, ascending.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Number of aligned rows.
  pub fn len(&self) -> usize {
    self.dates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dates.is_empty()
  }

  /// Price column for the instrument at basket position `idx`.
  pub fn column(&self, idx: usize) -> &[f64] {
    &self.columns[idx]
  }

  /// Most recent price per instrument, in basket order.
  pub fn latest_prices(&self) -> Vec<f64> {
    self.columns.iter().map(|c| c[c.len() - 1]).collect()
  }
}

/// Non-negative portfolio weights, parallel to the basket order.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightVector {
  weights: Vec<f64>,
}

impl WeightVector {
  pub fn new(weights: Vec<f64>) -> Self {
    Self { weights }
  }

  pub fn as_slice(&self) -> &[f64] {
    &self.weights
  }

  pub fn len(&self) -> usize {
    self.weights.len()
  }

  pub fn is_empty(&self) -> bool {
    self.weights.is_empty()
  }

  /// Check the weight invariants against a basket of `instrument_count`
  /// symbols: matching length, finite non-negative entries, sum equal to one
  /// within
  /// [`WEIGHT_SUM_TOLERANCE`].
  pub fn validate_for(&self, instrument_count: usize) -> Result<(), PortfolioError> {
    if self.weights.len() != instrument_count {
      return Err(PortfolioError::WeightMismatch(format!(
        "{} weight(s) for {} instrument(s)",
        self.weights.len(),
        instrument_count
      )));
    }

    if let Some(w) = self.weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
      return Err(PortfolioError::WeightMismatch(format!(
        "invalid weight {w}"
      )));
    }

    // Negated form so a NaN sum can never slip through the comparison.
    let sum: f64 = self.weights.iter().sum();
    if !((sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE) {
      return Err(PortfolioError::WeightMismatch(format!(
        "weights sum to {sum}, expected 1.0"
      )));
    }

    Ok(())
  }
}
