//! Ordered fallback across providers.
//!
//! Providers are tried in order; unavailable ones are skipped. The first
//! result that passes series validation and has at least `min_bars` bars
//! wins. The chain is itself a `DataProvider`.

use super::provider::{DataError, DataProvider, FetchResult};
use crate::domain::{validate_series, Timeframe};

pub struct FallbackChain {
    providers: Vec<Box<dyn DataProvider>>,
    min_bars: usize,
}

impl FallbackChain {
    pub fn new(min_bars: usize) -> Self {
        Self {
            providers: Vec::new(),
            min_bars,
        }
    }

    pub fn with(mut self, provider: Box<dyn DataProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn push(&mut self, provider: Box<dyn DataProvider>) {
        self.providers.push(provider);
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    fn accept(&self, result: &FetchResult) -> Result<(), DataError> {
        validate_series(&result.bars)?;
        if result.bars.len() < self.min_bars {
            return Err(DataError::InsufficientBars {
                required: self.min_bars,
                available: result.bars.len(),
            });
        }
        Ok(())
    }
}

impl DataProvider for FallbackChain {
    fn name(&self) -> &str {
        "fallback"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        let mut failures = Vec::new();
        for provider in &self.providers {
            if !provider.is_available() {
                tracing::info!(provider = provider.name(), "provider unavailable, skipping");
                failures.push((provider.name().to_string(), "unavailable".to_string()));
                continue;
            }
            let outcome = provider
                .fetch(symbol, timeframe)
                .and_then(|result| self.accept(&result).map(|()| result));
            match outcome {
                Ok(result) => {
                    tracing::info!(
                        provider = provider.name(),
                        source = %result.source,
                        bars = result.bars.len(),
                        "data fetched"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "provider failed, falling back");
                    failures.push((provider.name().to_string(), e.to_string()));
                }
            }
        }
        Err(DataError::AllSourcesFailed(failures))
    }

    fn is_available(&self) -> bool {
        self.providers.iter().any(|p| p.is_available())
    }
}
