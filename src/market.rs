//! # Market
//!
//! $$
//! \text{raw quotes} \xrightarrow{\ \text{inner join on date}\ } \text{PriceTable}
//! $$
//!
//! Price data model and the retrieval boundary.

pub mod provider;
pub mod table;
#[cfg(feature = "yahoo")]
pub mod yahoo;

pub use provider::FixtureProvider;
pub use provider::InstrumentQuotes;
pub use provider::PriceProvider;
pub use provider::Sampling;
pub use table::PriceTable;
pub use table::WeightVector;
pub use table::WEIGHT_SUM_TOLERANCE;
#[cfg(feature = "yahoo")]
pub use yahoo::YahooProvider;
