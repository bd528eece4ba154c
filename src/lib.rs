//! # portfolio-rs
//!
//! $$
//! r_t = \frac{p_t}{p_{t-1}} - 1
//! $$
//!
//! Performance and risk analytics for a fixed, weighted basket of daily
//! price history: simple and cumulative returns, price-level portfolio
//! aggregation, drawdowns, trailing-window volatility / simplified Sharpe /
//! historical VaR, and static plus rolling pairwise correlations.
//!
//! Retrieval is a swappable [`market::PriceProvider`] capability; the
//! computation itself is a pure, per-request batch driven by
//! [`analytics::AnalyticsPipeline`] and returns a single
//! [`analytics::PortfolioReport`] bundle.

pub mod analytics;
pub mod error;
pub mod market;

pub use analytics::AnalyticsPipeline;
pub use analytics::PipelineConfig;
pub use analytics::PortfolioReport;
pub use error::PortfolioError;
pub use market::PriceProvider;
pub use market::PriceTable;
pub use market::WeightVector;
