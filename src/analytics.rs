//! # Analytics
//!
//! $$
//! \text{prices} \to \text{returns} \to \text{cumulative} \to \text{risk series}
//! $$
//!
//! The computation core: every engine of the derivation chain plus the
//! pipeline object that runs them in dependency order.

pub mod correlation;
pub mod drawdown;
pub mod pipeline;
pub mod portfolio;
pub mod report;
pub mod returns;
pub mod rolling;

pub use correlation::correlation_matrix;
pub use correlation::correlation_pairs;
pub use correlation::rolling_correlation;
pub use correlation::SeriesLeg;
pub use drawdown::drawdowns;
pub use pipeline::AnalyticsPipeline;
pub use pipeline::PipelineConfig;
pub use pipeline::VAR_ALPHA;
pub use portfolio::aggregate;
pub use portfolio::PortfolioSeries;
pub use report::InstrumentReport;
pub use report::PortfolioReport;
pub use report::RollingCorrelation;
pub use report::RollingSummary;
pub use report::SeriesMetrics;
pub use returns::cumulative_growth;
pub use returns::simple_returns;
pub use rolling::rolling_sharpe;
pub use rolling::rolling_var;
pub use rolling::rolling_volatility;
pub use rolling::DEFAULT_WINDOW;
