//! # Returns
//!
//! $$
//! r_t = \frac{p_t}{p_{t-1}} - 1, \qquad c_t = \prod_{k \le t}(1 + r_k)
//! $$
//!
//! Simple daily returns and growth-of-one-unit curves.

use crate::error::PortfolioError;

/// Convert a price series to simple daily returns.
///
/// The first date has no prior price and is dropped, so the output is one
/// element shorter than the input. Fails with
/// [`PortfolioError::InsufficientHistory`] on fewer than two prices.
pub fn simple_returns(prices: &[f64]) -> Result<Vec<f64>, PortfolioError> {
  if prices.len() < 2 {
    return Err(PortfolioError::InsufficientHistory {
      rows: prices.len(),
      min: 2,
    });
  }

  let mut out = Vec::with_capacity(prices.len() - 1);
  for i in 1..prices.len() {
    out.push(prices[i] / prices[i - 1] - 1.0);
  }
  Ok(out)
}

/// Running product of `1 + r`, i.e. the growth of one invested unit.
///
/// The implicit start value before the first return is 1, so the first
/// output equals `1 + returns[0]`.
pub fn cumulative_growth(returns: &[f64]) -> Vec<f64> {
  let mut acc = 1.0;
  returns
    .iter()
    .map(|r| {
      acc *= 1.0 + r;
      acc
    })
    .collect()
}
