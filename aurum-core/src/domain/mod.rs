//! Domain types for Aurum

pub mod bar;
pub mod signal;
pub mod timeframe;

pub use bar::{validate_series, Bar, InputError};
pub use signal::Signal;
pub use timeframe::Timeframe;

/// Symbol type alias
pub type Symbol = String;
