//! # Pipeline
//!
//! $$
//! \text{PriceTable} \to r \to c \to P \to d \to (\sigma, S, \text{VaR}) \to \rho
//! $$
//!
//! Per-request orchestration of the analytics chain in its fixed dependency
//! order. One run is a pure batch over immutable inputs: nothing is cached,
//! recomputation on identical input is identical output.

use chrono::Duration;
use tracing::debug;

use crate::analytics::correlation::correlation_matrix;
use crate::analytics::correlation::correlation_pairs;
use crate::analytics::correlation::rolling_correlation;
use crate::analytics::correlation::SeriesLeg;
use crate::analytics::drawdown::drawdowns;
use crate::analytics::portfolio::aggregate;
use crate::analytics::report::InstrumentReport;
use crate::analytics::report::PortfolioReport;
use crate::analytics::report::RollingCorrelation;
use crate::analytics::report::RollingSummary;
use crate::analytics::report::SeriesMetrics;
use crate::analytics::returns::cumulative_growth;
use crate::analytics::returns::simple_returns;
use crate::analytics::rolling::rolling_sharpe;
use crate::analytics::rolling::rolling_var;
use crate::analytics::rolling::rolling_volatility;
use crate::analytics::rolling::DEFAULT_WINDOW;
use crate::error::PortfolioError;
use crate::market::InstrumentQuotes;
use crate::market::PriceProvider;
use crate::market::PriceTable;
use crate::market::Sampling;
use crate::market::WeightVector;

/// Tail probability of the historical VaR estimate (95% confidence).
pub const VAR_ALPHA: f64 = 0.05;

/// Runtime configuration for [`AnalyticsPipeline`].
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
  /// Portfolio weights, parallel to the requested basket order.
  pub weights: WeightVector,
  /// Trailing window length for the rolling statistics.
  pub window: usize,
}

impl PipelineConfig {
  /// Configuration with the reference 30-observation window.
  pub fn new(weights: WeightVector) -> Self {
    Self {
      weights,
      window: DEFAULT_WINDOW,
    }
  }

  pub fn with_window(mut self, window: usize) -> Self {
    self.window = window;
    self
  }
}

/// The whole derivation chain as an explicit per-request object.
///
/// Construct once with a config, then call [`AnalyticsPipeline::run`] per
/// retrieval request; there is no hidden process-wide state.
#[derive(Clone, Debug)]
pub struct AnalyticsPipeline {
  config: PipelineConfig,
}

impl AnalyticsPipeline {
  pub fn new(config: PipelineConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &PipelineConfig {
    &self.config
  }

  /// Fetch raw quotes through a provider and run the full chain on them.
  pub fn fetch_and_run(
    &self,
    provider: &dyn PriceProvider,
    instruments: &[String],
    lookback: Duration,
  ) -> Result<PortfolioReport, PortfolioError> {
    let quotes = provider.fetch(instruments, lookback, Sampling::Daily)?;
    self.run(&quotes)
  }

  /// Align raw quote rows and run the full chain.
  pub fn run(&self, quotes: &[InstrumentQuotes]) -> Result<PortfolioReport, PortfolioError> {
    let table = PriceTable::align(quotes)?;
    self.run_table(&table)
  }

  /// Run every engine over an already aligned table, in dependency order.
  pub fn run_table(&self, table: &PriceTable) -> Result<PortfolioReport, PortfolioError> {
    // Structural checks first: an invalid weight vector aborts the run
    // before any series is computed.
    self.config.weights.validate_for(table.instruments().len())?;
    debug!(
      instruments = table.instruments().len(),
      rows = table.len(),
      window = self.config.window,
      "pipeline run"
    );

    let window = self.config.window;
    let latest_prices = table.latest_prices();

    let mut instrument_returns: Vec<Vec<f64>> = Vec::with_capacity(table.instruments().len());
    for idx in 0..table.instruments().len() {
      instrument_returns.push(simple_returns(table.column(idx))?);
    }

    let portfolio_series = aggregate(table, &self.config.weights)?;

    let instruments = table
      .instruments()
      .iter()
      .enumerate()
      .map(|(idx, symbol)| InstrumentReport {
        symbol: symbol.clone(),
        latest_price: latest_prices[idx],
        metrics: derive_metrics(&instrument_returns[idx], window),
      })
      .collect();

    let portfolio = derive_metrics(&portfolio_series.returns, window);

    let correlation = correlation_matrix(&instrument_returns);
    let rolling_correlations = correlation_pairs(table.instruments())
      .into_iter()
      .map(|(left, right)| {
        let x = pair_series(&left, table, &instrument_returns, &portfolio_series.returns);
        let y = pair_series(&right, table, &instrument_returns, &portfolio_series.returns);
        RollingCorrelation {
          series: RollingSummary::new(rolling_correlation(x, y, window)),
          left,
          right,
        }
      })
      .collect();

    Ok(PortfolioReport {
      dates: table.dates()[1..].to_vec(),
      instruments,
      portfolio_level: portfolio_series.level,
      portfolio,
      correlation,
      rolling_correlations,
    })
  }
}

fn derive_metrics(returns: &[f64], window: usize) -> SeriesMetrics {
  let cumulative = cumulative_growth(returns);
  let dd = drawdowns(&cumulative);

  SeriesMetrics {
    volatility: RollingSummary::new(rolling_volatility(returns, window)),
    sharpe: RollingSummary::new(rolling_sharpe(returns, window)),
    var: RollingSummary::new(rolling_var(returns, window, VAR_ALPHA)),
    returns: returns.to_vec(),
    cumulative,
    drawdowns: dd,
  }
}

fn pair_series<'a>(
  leg: &SeriesLeg,
  table: &PriceTable,
  instrument_returns: &'a [Vec<f64>],
  portfolio_returns: &'a [f64],
) -> &'a [f64] {
  match leg {
    SeriesLeg::Portfolio => portfolio_returns,
    SeriesLeg::Instrument(symbol) => {
      let idx = table
        .instruments()
        .iter()
        .position(|s| s == symbol)
        .expect("pair legs come from the table's own basket");
      &instrument_returns[idx]
    }
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use chrono::NaiveDate;
  use tracing_test::traced_test;

  use super::*;

  fn synthetic_quotes() -> Vec<InstrumentQuotes> {
    // Three instruments, 40 synthetic daily prices each, on distinct price
    // scales and with distinct oscillation patterns.
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let paths: Vec<(&str, Box<dyn Fn(usize) -> f64>)> = vec![
      ("JPM", Box::new(|i| 150.0 + (i as f64) * 0.8 + ((i % 5) as f64))),
      ("NFLX", Box::new(|i| 500.0 - (i as f64) * 1.1 + ((i % 7) as f64) * 2.0)),
      ("BA", Box::new(|i| 180.0 + ((i % 3) as f64) * 4.0 - (i as f64) * 0.2)),
    ];

    paths
      .into_iter()
      .map(|(symbol, path)| InstrumentQuotes {
        symbol: symbol.to_string(),
        points: (0..40)
          .map(|i| (start + Duration::days(i as i64), path(i)))
          .collect(),
      })
      .collect()
  }

  fn pipeline() -> AnalyticsPipeline {
    AnalyticsPipeline::new(PipelineConfig::new(WeightVector::new(vec![0.4, 0.3, 0.3])))
  }

  #[test]
  #[traced_test]
  fn reference_scenario_shapes_and_portfolio_level() {
    let quotes = synthetic_quotes();
    let report = pipeline().run(&quotes).unwrap();

    // 40 price rows give 39 return dates.
    assert_eq!(report.dates.len(), 39);
    assert_eq!(report.portfolio_level.len(), 40);
    assert_eq!(report.instruments.len(), 3);

    for (t, level) in report.portfolio_level.iter().enumerate() {
      let expected = 0.4 * quotes[0].points[t].1
        + 0.3 * quotes[1].points[t].1
        + 0.3 * quotes[2].points[t].1;
      assert_relative_eq!(*level, expected, max_relative = 1e-12);
    }

    for instrument in &report.instruments {
      assert_eq!(instrument.metrics.returns.len(), 39);
      assert_eq!(instrument.metrics.cumulative.len(), 39);
      assert_eq!(instrument.metrics.drawdowns.len(), 39);
      // Rolling statistics first appear at index 29 (0-indexed).
      assert_eq!(instrument.metrics.volatility.first_defined(), Some(29));
      assert_eq!(instrument.metrics.var.first_defined(), Some(29));
    }
    assert_eq!(report.portfolio.volatility.first_defined(), Some(29));
  }

  #[test]
  fn rolling_volatility_matches_first_window_sample_std() {
    let quotes = synthetic_quotes();
    let report = pipeline().run(&quotes).unwrap();

    for instrument in &report.instruments {
      let window = &instrument.metrics.returns[..30];
      let mean = window.iter().sum::<f64>() / 30.0;
      let var = window.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / 29.0;
      assert_relative_eq!(
        instrument.metrics.volatility.values[29].unwrap(),
        var.sqrt(),
        max_relative = 1e-12
      );
    }
  }

  #[test]
  fn six_rolling_correlation_pairs_for_three_instruments() {
    let report = pipeline().run(&synthetic_quotes()).unwrap();

    let labels: Vec<String> = report
      .rolling_correlations
      .iter()
      .map(RollingCorrelation::label)
      .collect();
    assert_eq!(
      labels,
      vec![
        "JPM-NFLX",
        "JPM-BA",
        "NFLX-BA",
        "JPM-Portfolio",
        "NFLX-Portfolio",
        "BA-Portfolio"
      ]
    );
    for pair in &report.rolling_correlations {
      assert_eq!(pair.series.values.len(), 39);
      assert_eq!(pair.series.first_defined(), Some(29));
    }
  }

  #[test]
  fn correlation_matrix_is_in_basket_order() {
    let report = pipeline().run(&synthetic_quotes()).unwrap();

    assert_eq!(report.correlation.shape(), &[3, 3]);
    for i in 0..3 {
      assert_eq!(report.correlation[[i, i]], 1.0);
    }
  }

  #[test]
  fn invalid_weight_sum_aborts_the_whole_run() {
    let config = PipelineConfig::new(WeightVector::new(vec![0.5, 0.5, 0.5]));
    let err = AnalyticsPipeline::new(config)
      .run(&synthetic_quotes())
      .unwrap_err();
    assert!(matches!(err, PortfolioError::WeightMismatch(_)));
  }

  #[test]
  fn rerunning_identical_input_is_identical_output() {
    let quotes = synthetic_quotes();
    let pipeline = pipeline();

    let first = pipeline.run(&quotes).unwrap();
    let second = pipeline.run(&quotes).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn misaligned_instrument_truncates_every_series() {
    let mut quotes = synthetic_quotes();
    quotes[0].points.truncate(20);

    let report = pipeline().run(&quotes).unwrap();
    assert_eq!(report.dates.len(), 19);
    assert_eq!(report.portfolio_level.len(), 20);
    for instrument in &report.instruments {
      assert_eq!(instrument.metrics.returns.len(), 19);
      // 20 rows never fill a 30-observation window.
      assert_eq!(instrument.metrics.volatility.first_defined(), None);
    }
  }

  #[test]
  fn fetch_and_run_goes_through_the_provider_boundary() {
    let provider = crate::market::FixtureProvider::new(synthetic_quotes());
    let basket = vec!["JPM".to_string(), "NFLX".to_string(), "BA".to_string()];

    let report = pipeline()
      .fetch_and_run(&provider, &basket, Duration::days(3650))
      .unwrap();
    assert_eq!(report.instruments[0].symbol, "JPM");
    assert!(report.instrument("BA").is_some());
  }
}
