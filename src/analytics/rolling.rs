//! # Rolling Statistics
//!
//! $$
//! s_t = f\big(r_{t-w+1}, \dots, r_t\big)
//! $$
//!
//! Trailing fixed-window volatility, simplified Sharpe and historical VaR.
//! Dates before the window first fills carry no value, represented as `None`
//! rather than a sentinel number.

use tracing::debug;

/// Window length used by the reference pipeline.
pub const DEFAULT_WINDOW: usize = 30;

fn sample_mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}

fn sample_std(xs: &[f64]) -> f64 {
  if xs.len() < 2 {
    return 0.0;
  }

  let mean = sample_mean(xs);
  let mut acc = 0.0;
  for &x in xs {
    let d = x - mean;
    acc += d * d;
  }
  (acc / (xs.len() - 1) as f64).sqrt()
}

/// Empirical quantile with linear interpolation between order statistics.
fn empirical_quantile(xs: &[f64], q: f64) -> f64 {
  let mut sorted = xs.to_vec();
  sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

  let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
  let lo = pos.floor() as usize;
  let hi = pos.ceil() as usize;
  if lo == hi {
    sorted[lo]
  } else {
    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
  }
}

/// Evaluate `stat` over every trailing window of `window` observations.
///
/// The output is index-aligned with the input: entry `t` covers
/// `xs[t + 1 - window ..= t]`, and the first `window - 1` entries are `None`.
/// A `stat` may itself return `None` for a window where it is undefined.
pub fn rolling_apply<F>(xs: &[f64], window: usize, stat: F) -> Vec<Option<f64>>
where
  F: Fn(&[f64]) -> Option<f64>,
{
  let mut out = vec![None; xs.len()];
  if window == 0 || xs.len() < window {
    return out;
  }

  for t in (window - 1)..xs.len() {
    out[t] = stat(&xs[t + 1 - window..=t]);
  }
  out
}

/// Rolling sample standard deviation of returns. A window of fewer than two
/// observations has no sample dispersion and yields `None`.
pub fn rolling_volatility(returns: &[f64], window: usize) -> Vec<Option<f64>> {
  rolling_apply(returns, window, |w| {
    if w.len() < 2 {
      return None;
    }
    Some(sample_std(w))
  })
}

/// Rolling simplified Sharpe: window mean divided by window standard
/// deviation, with no risk-free adjustment. A zero-dispersion window has no
/// defined ratio and yields `None`.
pub fn rolling_sharpe(returns: &[f64], window: usize) -> Vec<Option<f64>> {
  rolling_apply(returns, window, |w| {
    let sd = sample_std(w);
    if sd < 1e-15 {
      debug!(window = w.len(), "zero-dispersion window, Sharpe undefined");
      return None;
    }
    Some(sample_mean(w) / sd)
  })
}

/// Rolling historical VaR: the `alpha` empirical quantile of window returns,
/// as a signed return (negative means loss).
pub fn rolling_var(returns: &[f64], window: usize, alpha: f64) -> Vec<Option<f64>> {
  rolling_apply(returns, window, |w| Some(empirical_quantile(w, alpha)))
}
