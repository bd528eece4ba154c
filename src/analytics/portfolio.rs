//! # Portfolio Aggregation
//!
//! $$
//! P_t = \sum_{i=1}^{n} w_i \, p_{i,t}
//! $$
//!
//! Weighted price-level aggregation and the derived portfolio series.

use crate::analytics::returns::cumulative_growth;
use crate::analytics::returns::simple_returns;
use crate::error::PortfolioError;
use crate::market::PriceTable;
use crate::market::WeightVector;

/// Portfolio level, returns and cumulative growth derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioSeries {
  /// Weight-dotted sum of raw instrument prices per date.
  pub level: Vec<f64>,
  /// Percent change of the level, one row shorter than the price table.
  pub returns: Vec<f64>,
  /// Running product of `1 + return` over the level returns.
  pub cumulative: Vec<f64>,
}

/// Aggregate a price table into a single portfolio series.
///
/// The portfolio is aggregated at the price level: the level is the weighted
/// sum of raw prices per date, and returns are derived from that level. This
/// is not the same as weighting per-instrument returns when price scales
/// differ across instruments; the price-level form is the contract here.
pub fn aggregate(
  table: &PriceTable,
  weights: &WeightVector,
) -> Result<PortfolioSeries, PortfolioError> {
  weights.validate_for(table.instruments().len())?;

  let w = weights.as_slice();
  let level: Vec<f64> = (0..table.len())
    .map(|t| {
      w.iter()
        .enumerate()
        .map(|(i, wi)| wi * table.column(i)[t])
        .sum()
    })
    .collect();

  let returns = simple_returns(&level)?;
  let cumulative = cumulative_growth(&returns);

  Ok(PortfolioSeries {
    level,
    returns,
    cumulative,
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use chrono::NaiveDate;

  use super::*;
  use crate::market::InstrumentQuotes;

  fn table(columns: &[(&str, Vec<f64>)]) -> PriceTable {
    let quotes: Vec<InstrumentQuotes> = columns
      .iter()
      .map(|(symbol, prices)| InstrumentQuotes {
        symbol: symbol.to_string(),
        points: prices
          .iter()
          .enumerate()
          .map(|(i, p)| {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
              + chrono::Duration::days(i as i64);
            (date, *p)
          })
          .collect(),
      })
      .collect();
    PriceTable::align(&quotes).unwrap()
  }

  #[test]
  fn level_is_the_weighted_price_sum() {
    let table = table(&[
      ("A", vec![100.0, 102.0, 104.0]),
      ("B", vec![50.0, 49.0, 51.0]),
      ("C", vec![10.0, 11.0, 12.0]),
    ]);
    let weights = WeightVector::new(vec![0.4, 0.3, 0.3]);

    let series = aggregate(&table, &weights).unwrap();
    assert_relative_eq!(
      series.level[0],
      0.4 * 100.0 + 0.3 * 50.0 + 0.3 * 10.0,
      max_relative = 1e-12
    );
    assert_relative_eq!(
      series.level[2],
      0.4 * 104.0 + 0.3 * 51.0 + 0.3 * 12.0,
      max_relative = 1e-12
    );
    assert_eq!(series.returns.len(), 2);
    assert_eq!(series.cumulative.len(), 2);
  }

  #[test]
  fn returns_come_from_the_level_not_from_instrument_returns() {
    // Identical +1% moves on very different price scales: the level return
    // is dominated by the expensive instrument, unlike a weighted return
    // average which would be exactly 1% for both.
    let table = table(&[
      ("A", vec![1000.0, 1010.0]),
      ("B", vec![1.0, 1.01]),
    ]);
    let weights = WeightVector::new(vec![0.5, 0.5]);

    let series = aggregate(&table, &weights).unwrap();
    let expected = (0.5 * 1010.0 + 0.5 * 1.01) / (0.5 * 1000.0 + 0.5 * 1.0) - 1.0;
    assert_relative_eq!(series.returns[0], expected, max_relative = 1e-12);
  }

  #[test]
  fn invalid_weights_abort_before_any_series() {
    let table = table(&[("A", vec![1.0, 2.0]), ("B", vec![2.0, 3.0]), ("C", vec![3.0, 4.0])]);
    let weights = WeightVector::new(vec![0.5, 0.5, 0.5]);

    let err = aggregate(&table, &weights).unwrap_err();
    assert!(matches!(err, PortfolioError::WeightMismatch(_)));
  }
}
