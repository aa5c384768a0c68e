//! Data-source collaborators: CSV files, synthetic data and the fallback chain.

use aurum_core::data::{
    CsvProvider, DataError, DataProvider, DataSource, FallbackChain, FetchResult, Scenario,
    SyntheticProvider,
};
use aurum_core::{Bar, Timeframe};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 21, 0, 0).unwrap()
}

/// Provider returning a fixed result or a fixed failure.
struct MockProvider {
    name: &'static str,
    available: bool,
    bars: Option<Vec<Bar>>,
}

impl DataProvider for MockProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        match &self.bars {
            Some(bars) => Ok(FetchResult {
                symbol: symbol.to_string(),
                timeframe,
                bars: bars.clone(),
                source: DataSource::YahooFinance,
            }),
            None => Err(DataError::NetworkUnreachable("mock offline".into())),
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

fn demo_bars(n: usize) -> Vec<Bar> {
    SyntheticProvider::new(Scenario::Demo, anchor())
        .with_bars(n)
        .generate("GLD", Timeframe::OneDay)
}

// ── CSV ──────────────────────────────────────────────────────────────

#[test]
fn csv_roundtrip_through_provider() {
    let dir = tempfile::tempdir().unwrap();
    let provider = CsvProvider::new(dir.path());
    let bars = demo_bars(60);
    CsvProvider::write_bars(&provider.path_for("GLD", Timeframe::OneDay), &bars).unwrap();

    let fetched = provider.fetch("GLD", Timeframe::OneDay).unwrap();
    assert_eq!(fetched.source, DataSource::CsvImport);
    assert_eq!(fetched.bars, bars);
}

#[test]
fn csv_accepts_plain_timestamps_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("GLD_2d.csv");
    std::fs::write(
        &path,
        "timestamp,open,high,low,close,volume\n\
         2024-03-04 14:45:00,190.5,191.0,190.1,190.8,1200\n\
         2024-03-04 14:30:00,190.0,190.6,189.7,190.5,1500\n",
    )
    .unwrap();

    let fetched = CsvProvider::new(dir.path()).fetch("GLD", Timeframe::TwoDays).unwrap();
    assert_eq!(fetched.bars.len(), 2);
    assert_eq!(fetched.bars[0].close, 190.5);
    assert_eq!(fetched.bars[1].timestamp - fetched.bars[0].timestamp, Duration::minutes(15));
}

#[test]
fn csv_reports_bad_rows() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("GLD_1d.csv"),
        "timestamp,open,high,low,close,volume\nyesterday,1,2,0.5,1.5,10\n",
    )
    .unwrap();
    let err = CsvProvider::new(dir.path())
        .fetch("GLD", Timeframe::OneDay)
        .unwrap_err();
    assert!(matches!(err, DataError::Csv { .. }));
}

#[test]
fn csv_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        CsvProvider::new(dir.path()).fetch("SLV", Timeframe::OneDay),
        Err(DataError::SymbolNotFound { .. })
    ));
}

// ── Fallback chain ───────────────────────────────────────────────────

#[test]
fn falls_through_to_first_good_source() {
    let chain = FallbackChain::new(50)
        .with(Box::new(MockProvider {
            name: "down",
            available: true,
            bars: None,
        }))
        .with(Box::new(MockProvider {
            name: "skipped",
            available: false,
            bars: Some(demo_bars(80)),
        }))
        .with(Box::new(SyntheticProvider::new(Scenario::Demo, anchor())));

    let result = chain.fetch("GLD", Timeframe::OneDay).unwrap();
    assert_eq!(result.source, DataSource::Synthetic);
    assert_eq!(chain.provider_names(), vec!["down", "skipped", "synthetic"]);
}

#[test]
fn short_series_is_rejected() {
    let chain = FallbackChain::new(50).with(Box::new(MockProvider {
        name: "short",
        available: true,
        bars: Some(demo_bars(20)),
    }));
    match chain.fetch("GLD", Timeframe::OneDay) {
        Err(DataError::AllSourcesFailed(failures)) => {
            assert_eq!(failures.len(), 1);
            assert!(failures[0].1.contains("insufficient"));
        }
        other => panic!("expected AllSourcesFailed, got {other:?}"),
    }
}

#[test]
fn invalid_series_is_rejected() {
    let mut bars = demo_bars(60);
    bars[10].high = bars[10].low - 1.0;
    let chain = FallbackChain::new(50)
        .with(Box::new(MockProvider {
            name: "broken",
            available: true,
            bars: Some(bars),
        }))
        .with(Box::new(MockProvider {
            name: "good",
            available: true,
            bars: Some(demo_bars(60)),
        }));
    let result = chain.fetch("GLD", Timeframe::OneDay).unwrap();
    assert_eq!(result.bars.len(), 60);
}

#[test]
fn empty_chain_fails() {
    let chain = FallbackChain::new(50);
    assert!(!chain.is_available());
    assert!(matches!(
        chain.fetch("GLD", Timeframe::OneDay),
        Err(DataError::AllSourcesFailed(_))
    ));
}
