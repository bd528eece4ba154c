use anyhow::Result;
use chrono::Duration;
use chrono::NaiveDate;
use prettytable::row;
use prettytable::Table;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;
use rand_distr::Normal;

use portfolio_rs::analytics::AnalyticsPipeline;
use portfolio_rs::analytics::PipelineConfig;
use portfolio_rs::analytics::PortfolioReport;
use portfolio_rs::analytics::SeriesMetrics;
use portfolio_rs::error::PortfolioError;
use portfolio_rs::market::FixtureProvider;
use portfolio_rs::market::InstrumentQuotes;
use portfolio_rs::market::WeightVector;

/// Reference basket of the original dashboard:
/// (symbol, start price, annualized drift, annualized volatility).
const BASKET: [(&str, f64, f64, f64); 3] = [
  ("JPM", 150.0, 0.09, 0.22),
  ("NFLX", 480.0, 0.12, 0.38),
  ("BA", 185.0, 0.04, 0.30),
];
const WEIGHTS: [f64; 3] = [0.4, 0.3, 0.3];
const DAYS: usize = 504;

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let provider = FixtureProvider::new(synthetic_basket());
  let basket: Vec<String> = BASKET.iter().map(|(s, ..)| s.to_string()).collect();

  let config = PipelineConfig::new(WeightVector::new(WEIGHTS.to_vec()));
  let pipeline = AnalyticsPipeline::new(config);
  let report = pipeline.fetch_and_run(&provider, &basket, Duration::days(DAYS as i64))?;

  print_performance(&report);
  print_rolling(&report);
  print_correlations(&report);
  Ok(())
}

/// Seeded geometric Brownian motion paths standing in for live retrieval.
fn synthetic_basket() -> Vec<InstrumentQuotes> {
  let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
  let mut rng = StdRng::seed_from_u64(7);
  let normal = Normal::new(0.0, 1.0).unwrap();
  let dt = 1.0 / 252.0;

  BASKET
    .iter()
    .map(|(symbol, s0, mu, sigma)| {
      let mut price = *s0;
      let points = (0..DAYS)
        .map(|i| {
          let z: f64 = normal.sample(&mut rng);
          price *= ((mu - 0.5 * sigma * sigma) * dt + sigma * dt.sqrt() * z).exp();
          (start + Duration::days(i as i64), price)
        })
        .collect();
      InstrumentQuotes {
        symbol: symbol.to_string(),
        points,
      }
    })
    .collect()
}

fn print_performance(report: &PortfolioReport) {
  let mut table = Table::new();
  table.add_row(row![
    "Series",
    "Latest price",
    "Daily return",
    "Cumulative return",
    "Drawdown"
  ]);

  for instrument in &report.instruments {
    let m = &instrument.metrics;
    table.add_row(row![
      instrument.symbol,
      format!("{:.2}", instrument.latest_price),
      pct(m.latest_return()),
      pct(m.latest_cumulative() - 1.0),
      pct(m.latest_drawdown())
    ]);
  }

  let level = report.portfolio_level[report.portfolio_level.len() - 1];
  table.add_row(row![
    "Portfolio",
    format!("{:.2}", level),
    pct(report.portfolio.latest_return()),
    pct(report.portfolio.latest_cumulative() - 1.0),
    pct(report.portfolio.latest_drawdown())
  ]);

  println!("Performance");
  table.printstd();
}

fn print_rolling(report: &PortfolioReport) {
  let mut table = Table::new();
  table.add_row(row![
    "Series",
    "Vol (latest)",
    "Vol (avg)",
    "Sharpe (latest)",
    "Sharpe (avg)",
    "VaR 95% (latest)",
    "VaR 95% (avg)"
  ]);

  let mut rows: Vec<(&str, &SeriesMetrics)> = report
    .instruments
    .iter()
    .map(|i| (i.symbol.as_str(), &i.metrics))
    .collect();
  rows.push(("Portfolio", &report.portfolio));

  for (label, metrics) in rows {
    table.add_row(row![
      label,
      kpi_pct(metrics.volatility.latest()),
      kpi_pct(metrics.volatility.average()),
      kpi(metrics.sharpe.latest()),
      kpi(metrics.sharpe.average()),
      kpi_pct(metrics.var.latest()),
      kpi_pct(metrics.var.average())
    ]);
  }

  println!("\n30-day rolling statistics");
  table.printstd();
}

fn print_correlations(report: &PortfolioReport) {
  let mut matrix = Table::new();
  let mut header = row!["Correlation"];
  for instrument in &report.instruments {
    header.add_cell(prettytable::Cell::new(&instrument.symbol));
  }
  matrix.add_row(header);

  for (i, instrument) in report.instruments.iter().enumerate() {
    let mut line = row![instrument.symbol];
    for j in 0..report.instruments.len() {
      line.add_cell(prettytable::Cell::new(&format!(
        "{:.3}",
        report.correlation[[i, j]]
      )));
    }
    matrix.add_row(line);
  }

  println!("\nFull-history correlation matrix");
  matrix.printstd();

  let mut rolling = Table::new();
  rolling.add_row(row!["Pair", "Rolling corr (latest)", "Rolling corr (avg)"]);
  for pair in &report.rolling_correlations {
    rolling.add_row(row![
      pair.label(),
      kpi(pair.series.latest()),
      kpi(pair.series.average())
    ]);
  }

  println!("\n30-day rolling correlations");
  rolling.printstd();
}

fn pct(v: f64) -> String {
  format!("{:.2}%", v * 100.0)
}

fn kpi(v: Result<f64, PortfolioError>) -> String {
  match v {
    Ok(v) => format!("{v:.2}"),
    Err(_) => "n/a".to_string(),
  }
}

fn kpi_pct(v: Result<f64, PortfolioError>) -> String {
  match v {
    Ok(v) => pct(v),
    Err(_) => "n/a".to_string(),
  }
}
