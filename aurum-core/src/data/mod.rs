//! Data-source collaborators: everything that turns a symbol and timeframe
//! into a validated bar series.

pub mod alpha_vantage;
pub mod circuit_breaker;
pub mod csv_import;
pub mod fallback;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use crate::domain::Timeframe;
pub use alpha_vantage::AlphaVantageProvider;
pub use circuit_breaker::CircuitBreaker;
pub use csv_import::CsvProvider;
pub use fallback::FallbackChain;
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use synthetic::{Scenario, SyntheticProvider};
pub use yahoo::YahooProvider;
