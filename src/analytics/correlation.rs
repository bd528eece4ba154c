//! # Correlation
//!
//! $$
//! \rho_{xy} = \frac{\sum_t (x_t-\bar x)(y_t-\bar y)}
//!                  {\sqrt{\sum_t (x_t-\bar x)^2 \sum_t (y_t-\bar y)^2}}
//! $$
//!
//! Static full-history correlation matrix and trailing-window pairwise
//! correlation series, including each instrument against the portfolio.

use std::fmt;

use ndarray::Array2;

fn sample_mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
  let n = x.len().min(y.len());
  if n < 2 {
    return None;
  }

  let mx = sample_mean(x);
  let my = sample_mean(y);

  let mut cov = 0.0;
  let mut sx = 0.0;
  let mut sy = 0.0;

  for i in 0..n {
    let dx = x[i] - mx;
    let dy = y[i] - my;
    cov += dx * dy;
    sx += dx * dx;
    sy += dy * dy;
  }

  let denom = (sx * sy).sqrt();
  if denom < 1e-15 {
    None
  } else {
    Some((cov / denom).clamp(-1.0, 1.0))
  }
}

/// Pearson correlation matrix over the full aligned return history.
///
/// Symmetric with a forced unit diagonal. A degenerate (zero-variance)
/// series correlates at 0.0 with everything else; the matrix is dense, so
/// there is no per-cell undefined marker.
pub fn correlation_matrix(returns: &[Vec<f64>]) -> Array2<f64> {
  let n = returns.len();
  let mut corr = Array2::<f64>::eye(n);

  for i in 0..n {
    for j in (i + 1)..n {
      let r = pearson(&returns[i], &returns[j]).unwrap_or(0.0);
      corr[[i, j]] = r;
      corr[[j, i]] = r;
    }
  }

  corr
}

/// Trailing-window Pearson correlation between two aligned return series.
///
/// Same no-value-before-the-window-fills shape as the other rolling series;
/// a window where either side has zero variance is `None`.
pub fn rolling_correlation(x: &[f64], y: &[f64], window: usize) -> Vec<Option<f64>> {
  let n = x.len().min(y.len());
  let mut out = vec![None; n];
  if window == 0 || n < window {
    return out;
  }

  for t in (window - 1)..n {
    out[t] = pearson(&x[t + 1 - window..=t], &y[t + 1 - window..=t]);
  }
  out
}

/// One side of a correlation pair: a basket instrument or the portfolio.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SeriesLeg {
  Instrument(String),
  Portfolio,
}

impl fmt::Display for SeriesLeg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SeriesLeg::Instrument(symbol) => write!(f, "{symbol}"),
      SeriesLeg::Portfolio => write!(f, "Portfolio"),
    }
  }
}

/// The fixed ordered pair list for rolling correlations: every instrument
/// pair `(i, j)` with `i < j`, then each instrument against the portfolio.
/// For a three-instrument basket this is the original dashboard's six pairs.
pub fn correlation_pairs(instruments: &[String]) -> Vec<(SeriesLeg, SeriesLeg)> {
  let mut pairs = Vec::new();

  for i in 0..instruments.len() {
    for j in (i + 1)..instruments.len() {
      pairs.push((
        SeriesLeg::Instrument(instruments[i].clone()),
        SeriesLeg::Instrument(instruments[j].clone()),
      ));
    }
  }
  for symbol in instruments {
    pairs.push((SeriesLeg::Instrument(symbol.clone()), SeriesLeg::Portfolio));
  }

  pairs
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn matrix_has_unit_diagonal_and_is_symmetric() {
    let returns = vec![
      vec![0.01, -0.02, 0.015, 0.0, -0.01],
      vec![0.02, 0.01, -0.005, 0.01, 0.0],
      vec![-0.01, 0.03, 0.0, -0.02, 0.01],
    ];
    let corr = correlation_matrix(&returns);

    for i in 0..3 {
      assert_eq!(corr[[i, i]], 1.0);
      for j in 0..3 {
        assert_abs_diff_eq!(corr[[i, j]], corr[[j, i]], epsilon = 1e-12);
        assert!(corr[[i, j]] >= -1.0 && corr[[i, j]] <= 1.0);
      }
    }
  }

  #[test]
  fn linear_dependence_is_exactly_plus_minus_one() {
    let x = vec![0.01, 0.02, -0.01, 0.03];
    let doubled: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
    let negated: Vec<f64> = x.iter().map(|v| -v).collect();

    let corr = correlation_matrix(&[x, doubled, negated]);
    assert_abs_diff_eq!(corr[[0, 1]], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(corr[[0, 2]], -1.0, epsilon = 1e-12);
  }

  #[test]
  fn rolling_correlation_fills_at_the_window_boundary() {
    let x: Vec<f64> = (0..40).map(|i| (i as f64).sin() * 0.01).collect();
    let y: Vec<f64> = (0..40).map(|i| (i as f64).cos() * 0.01).collect();
    let corr = rolling_correlation(&x, &y, 30);

    assert_eq!(corr.len(), 40);
    assert!(corr[..29].iter().all(Option::is_none));
    assert!(corr[29..].iter().all(Option::is_some));
    assert_abs_diff_eq!(
      corr[29].unwrap(),
      pearson(&x[..30], &y[..30]).unwrap(),
      epsilon = 1e-12
    );
  }

  #[test]
  fn degenerate_windows_have_no_value() {
    let x = vec![0.01; 35];
    let y: Vec<f64> = (0..35).map(|i| (i as f64) * 0.001).collect();
    assert!(rolling_correlation(&x, &y, 30).iter().all(Option::is_none));
  }

  #[test]
  fn three_instruments_give_six_named_pairs() {
    let basket = vec!["JPM".to_string(), "NFLX".to_string(), "BA".to_string()];
    let pairs = correlation_pairs(&basket);

    assert_eq!(pairs.len(), 6);
    assert_eq!(pairs[0].0.to_string(), "JPM");
    assert_eq!(pairs[0].1.to_string(), "NFLX");
    assert_eq!(pairs[2].0.to_string(), "NFLX");
    assert_eq!(pairs[2].1.to_string(), "BA");
    assert_eq!(pairs[3].1, SeriesLeg::Portfolio);
    assert_eq!(pairs[5].0.to_string(), "BA");
  }
}
