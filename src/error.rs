//! # Errors
//!
//! $$
//! \text{run}: \text{raw rows} \to \text{report} \ \cup \ \text{error}
//! $$
//!
//! Error taxonomy for the analytics pipeline. Structural errors abort a run;
//! per-window statistical gaps are represented as `None` entries in the
//! affected series instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
  /// Price retrieval returned no rows at all.
  #[error("price retrieval returned no rows")]
  DataUnavailable,

  /// No trading date is shared by every instrument after the inner join.
  #[error("no common trading dates across instruments after alignment")]
  AlignmentError,

  /// Too few aligned price rows to derive returns.
  #[error("insufficient price history: {rows} row(s), at least {min} required")]
  InsufficientHistory { rows: usize, min: usize },

  /// Weight vector does not match the basket or does not sum to one.
  #[error("weight mismatch: {0}")]
  WeightMismatch(String),

  /// A requested statistic has no defined value, e.g. a zero-variance window
  /// or a rolling series queried before its window ever filled.
  #[error("undefined statistic: {0}")]
  UndefinedStatistic(String),

  /// The price provider failed before producing any usable rows.
  #[error("price retrieval failed: {0}")]
  Retrieval(String),
}
