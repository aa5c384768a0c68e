//! Analyzer settings: the engine configuration plus data-source options.
//!
//! ```toml
//! symbol = "GLD"
//!
//! [engine.ema]
//! short_period = 9
//!
//! [data]
//! use_yahoo = true
//! synthetic_fallback = true
//! min_bars = 50
//! ```

use anyhow::{bail, Context, Result};
use aurum_core::data::{
    AlphaVantageProvider, CircuitBreaker, CsvProvider, FallbackChain, Scenario, SyntheticProvider,
    YahooProvider,
};
use aurum_core::EngineConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable that overrides `data.alpha_vantage_api_key`.
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub symbol: String,
    pub engine: EngineConfig,
    pub data: DataSettings,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            symbol: "GLD".into(),
            engine: EngineConfig::default(),
            data: DataSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub alpha_vantage_api_key: Option<String>,
    pub use_yahoo: bool,
    pub synthetic_fallback: bool,
    /// Minimum bars a source must deliver to be accepted.
    pub min_bars: usize,
    /// Price level the synthetic series oscillates around.
    pub synthetic_base_price: f64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            use_yahoo: true,
            synthetic_fallback: true,
            min_bars: 50,
            synthetic_base_price: 200.0,
        }
    }
}

/// Where the bars should come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceMode {
    /// Alpha Vantage, then Yahoo, then CSV files (if a directory is given),
    /// then synthetic bars (if enabled).
    Live { csv_dir: Option<PathBuf> },
    /// Synthetic bars only.
    Demo(Scenario),
}

impl AnalyzerSettings {
    pub fn from_toml(s: &str) -> Result<Self> {
        let settings: Self = toml::from_str(s).context("failed to parse settings TOML")?;
        settings.engine.validate().context("invalid engine configuration")?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Apply an API key from the environment, which wins over the file value.
    pub fn apply_env(&mut self) {
        self.apply_api_key(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.data.alpha_vantage_api_key = Some(key);
        }
    }

    /// Build the provider chain for `mode`.
    ///
    /// `end` anchors synthetic series; callers pass the current time for live
    /// runs and any fixed instant for reproducible ones.
    pub fn build_chain(&self, mode: &SourceMode, end: DateTime<Utc>) -> Result<FallbackChain> {
        let base_price = self.data.synthetic_base_price;
        if !(base_price.is_finite() && base_price > 0.0) {
            bail!("data.synthetic_base_price must be a positive number, got {base_price}");
        }
        let synthetic =
            |scenario| SyntheticProvider::new(scenario, end).with_base_price(base_price);
        let mut chain = FallbackChain::new(self.data.min_bars);

        match mode {
            SourceMode::Demo(scenario) => {
                chain.push(Box::new(synthetic(*scenario)));
            }
            SourceMode::Live { csv_dir } => {
                let av = AlphaVantageProvider::new(self.data.alpha_vantage_api_key.clone())
                    .context("failed to set up Alpha Vantage client")?;
                chain.push(Box::new(av));

                if self.data.use_yahoo {
                    let breaker = Arc::new(CircuitBreaker::default_provider());
                    let yahoo =
                        YahooProvider::new(breaker).context("failed to set up Yahoo client")?;
                    chain.push(Box::new(yahoo));
                }
                if let Some(dir) = csv_dir {
                    chain.push(Box::new(CsvProvider::new(dir.clone())));
                }
                if self.data.synthetic_fallback {
                    chain.push(Box::new(synthetic(Scenario::Demo)));
                }
            }
        }

        tracing::debug!(providers = ?chain.provider_names(), "provider chain built");
        Ok(chain)
    }
}
