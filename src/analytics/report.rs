//! # Report
//!
//! $$
//! \text{report} = \big(\text{series}, \text{KPIs}, \rho\big)
//! $$
//!
//! The in-memory result bundle handed to the presentation layer. Rolling
//! entries that never became defined stay `None`; the KPI accessors turn a
//! missing value into an explicit [`PortfolioError::UndefinedStatistic`]
//! instead of a silent zero.

use chrono::NaiveDate;
use ndarray::Array2;

use crate::analytics::correlation::SeriesLeg;
use crate::error::PortfolioError;

/// A rolling statistic series plus its KPI accessors.
#[derive(Clone, Debug, PartialEq)]
pub struct RollingSummary {
  /// One entry per return date; `None` before the window fills and for
  /// undefined windows.
  pub values: Vec<Option<f64>>,
}

impl RollingSummary {
  pub fn new(values: Vec<Option<f64>>) -> Self {
    Self { values }
  }

  /// Index of the first defined entry, if the window ever filled.
  pub fn first_defined(&self) -> Option<usize> {
    self.values.iter().position(Option::is_some)
  }

  /// Most recent value.
  pub fn latest(&self) -> Result<f64, PortfolioError> {
    self
      .values
      .last()
      .copied()
      .flatten()
      .ok_or_else(|| PortfolioError::UndefinedStatistic("no defined value yet".to_string()))
  }

  /// Mean over the defined entries only.
  pub fn average(&self) -> Result<f64, PortfolioError> {
    let defined: Vec<f64> = self.values.iter().copied().flatten().collect();
    if defined.is_empty() {
      return Err(PortfolioError::UndefinedStatistic(
        "no defined value in series".to_string(),
      ));
    }
    Ok(defined.iter().sum::<f64>() / defined.len() as f64)
  }
}

/// Derived series shared by every instrument and the portfolio itself.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesMetrics {
  pub returns: Vec<f64>,
  pub cumulative: Vec<f64>,
  pub drawdowns: Vec<f64>,
  pub volatility: RollingSummary,
  pub sharpe: RollingSummary,
  pub var: RollingSummary,
}

impl SeriesMetrics {
  /// Most recent daily return.
  pub fn latest_return(&self) -> f64 {
    self.returns[self.returns.len() - 1]
  }

  /// Most recent growth-of-one-unit value.
  pub fn latest_cumulative(&self) -> f64 {
    self.cumulative[self.cumulative.len() - 1]
  }

  /// Most recent drawdown.
  pub fn latest_drawdown(&self) -> f64 {
    self.drawdowns[self.drawdowns.len() - 1]
  }
}

/// Per-instrument slice of the report.
#[derive(Clone, Debug, PartialEq)]
pub struct InstrumentReport {
  pub symbol: String,
  pub latest_price: f64,
  pub metrics: SeriesMetrics,
}

/// One named rolling-correlation series.
#[derive(Clone, Debug, PartialEq)]
pub struct RollingCorrelation {
  pub left: SeriesLeg,
  pub right: SeriesLeg,
  pub series: RollingSummary,
}

impl RollingCorrelation {
  /// Display label, e.g. `JPM-NFLX` or `BA-Portfolio`.
  pub fn label(&self) -> String {
    format!("{}-{}", self.left, self.right)
  }
}

/// Everything one pipeline run derives from an aligned price table.
#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioReport {
  /// Date index of the return-derived series (price dates minus the first).
  pub dates: Vec<NaiveDate>,
  pub instruments: Vec<InstrumentReport>,
  /// Weighted portfolio price level, one entry per price date.
  pub portfolio_level: Vec<f64>,
  pub portfolio: SeriesMetrics,
  /// Static full-history correlation matrix in basket order.
  pub correlation: Array2<f64>,
  pub rolling_correlations: Vec<RollingCorrelation>,
}

impl PortfolioReport {
  /// Look up an instrument slice by symbol.
  pub fn instrument(&self, symbol: &str) -> Option<&InstrumentReport> {
    self.instruments.iter().find(|i| i.symbol == symbol)
  }
}
