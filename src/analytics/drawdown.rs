//! # Drawdowns
//!
//! $$
//! d_t = \frac{c_t}{\max_{k \le t} c_k} - 1
//! $$
//!
//! Percentage decline from the running peak of a cumulative series.

/// Drawdown series of a cumulative growth curve, same length as the input.
///
/// The running maximum is taken left-to-right over the history so far; it
/// never resets, and every output is `<= 0`.
pub fn drawdowns(cumulative: &[f64]) -> Vec<f64> {
  let mut peak = f64::NEG_INFINITY;
  cumulative
    .iter()
    .map(|c| {
      if *c > peak {
        peak = *c;
      }
      c / peak - 1.0
    })
    .collect()
}
