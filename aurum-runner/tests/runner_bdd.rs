//! BDD tests for the runner: analysis, multi-timeframe consensus, replay,
//! and artifact export.

use aurum_core::data::{
    CsvProvider, DataError, DataProvider, DataSource, FetchResult, Scenario, SyntheticProvider,
};
use aurum_core::{EngineConfig, Signal, Timeframe};
use aurum_runner::{
    analyze, analyze_timeframes, import_replay_json, load_replay, replay, replay_json,
    save_replay, AnalyzerSettings, Consensus, SourceMode,
};
use chrono::{DateTime, TimeZone, Utc};

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 8, 21, 0, 0).unwrap()
}

/// Serves synthetic bars but refuses one timeframe.
struct FlakyProvider {
    inner: SyntheticProvider,
    broken: Timeframe,
}

impl DataProvider for FlakyProvider {
    fn name(&self) -> &str {
        "flaky"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        if timeframe == self.broken {
            return Err(DataError::NetworkUnreachable("connection reset".into()));
        }
        self.inner.fetch(symbol, timeframe)
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[test]
fn bdd_scenario_quick_analysis_on_demo_data() {
    // GIVEN default settings in demo mode
    let settings = AnalyzerSettings::default();
    let chain = settings
        .build_chain(&SourceMode::Demo(Scenario::Demo), anchor())
        .unwrap();

    // WHEN the 1d timeframe is analyzed
    let analysis = analyze(&chain, &settings.symbol, Timeframe::OneDay, &settings.engine).unwrap();

    // THEN the report comes from synthetic data and covers every bar
    assert_eq!(analysis.source, DataSource::Synthetic);
    assert_eq!(analysis.symbol, "GLD");
    assert_eq!(analysis.bar_count, 100);
    assert_eq!(analysis.report.timestamp, anchor());
    assert_eq!(analysis.report.readings().len(), 4);
    assert_eq!(
        analysis.report.config_fingerprint,
        settings.engine.fingerprint()
    );
}

#[test]
fn bdd_scenario_same_inputs_same_report() {
    // GIVEN the same provider and config
    let provider = SyntheticProvider::new(Scenario::Sideways, anchor());
    let config = EngineConfig::default();

    // WHEN analyzed twice
    let a = analyze(&provider, "GLD", Timeframe::TwoDays, &config).unwrap();
    let b = analyze(&provider, "GLD", Timeframe::TwoDays, &config).unwrap();

    // THEN the reports are identical
    assert_eq!(a.report, b.report);
}

#[test]
fn bdd_scenario_failed_fetch_is_reported_with_context() {
    // GIVEN a provider that fails for 5d
    let provider = FlakyProvider {
        inner: SyntheticProvider::new(Scenario::Demo, anchor()),
        broken: Timeframe::FiveDays,
    };

    // WHEN 5d is analyzed alone
    let err = analyze(&provider, "GLD", Timeframe::FiveDays, &EngineConfig::default()).unwrap_err();

    // THEN the error names the symbol and timeframe and keeps the cause
    let msg = format!("{err:#}");
    assert!(msg.contains("GLD (5d)"), "{msg}");
    assert!(msg.contains("connection reset"), "{msg}");
}

#[test]
fn bdd_scenario_multi_timeframe_keeps_going_after_a_failure() {
    // GIVEN a provider that fails for 5d only
    let provider = FlakyProvider {
        inner: SyntheticProvider::new(Scenario::Bullish, anchor()),
        broken: Timeframe::FiveDays,
    };

    // WHEN all three timeframes are analyzed
    let multi = analyze_timeframes(
        &provider,
        "GLD",
        &Timeframe::ALL,
        &EngineConfig::default(),
    );

    // THEN outcomes stay in request order
    let order: Vec<Timeframe> = multi.outcomes.iter().map(|o| o.timeframe).collect();
    assert_eq!(order, Timeframe::ALL.to_vec());

    // AND two succeed while 5d carries its error
    assert_eq!(multi.successes().count(), 2);
    let failures: Vec<Timeframe> = multi.failures().map(|(tf, _)| tf).collect();
    assert_eq!(failures, vec![Timeframe::FiveDays]);

    // AND consensus only counts the successes
    let expected = Consensus::from_signals(multi.successes().map(|a| a.report.signal()));
    assert_eq!(multi.consensus, expected);
}

#[test]
fn bdd_scenario_no_data_when_everything_fails() {
    // GIVEN an empty fallback chain
    let chain = aurum_core::data::FallbackChain::new(50);

    // WHEN all timeframes are analyzed
    let multi = analyze_timeframes(&chain, "GLD", &Timeframe::ALL, &EngineConfig::default());

    // THEN there is no consensus to speak of
    assert_eq!(multi.consensus, Consensus::NoData);
    assert_eq!(multi.failures().count(), 3);
}

#[test]
fn bdd_scenario_csv_directory_feeds_the_chain() {
    // GIVEN bars written to a CSV directory and a live chain with only CSV enabled
    let dir = tempfile::tempdir().unwrap();
    let bars = SyntheticProvider::new(Scenario::Bearish, anchor()).generate("GLD", Timeframe::OneDay);
    let csv = CsvProvider::new(dir.path());
    CsvProvider::write_bars(&csv.path_for("GLD", Timeframe::OneDay), &bars).unwrap();

    let mut settings = AnalyzerSettings::default();
    settings.data.use_yahoo = false;
    settings.data.synthetic_fallback = false;
    let chain = settings
        .build_chain(
            &SourceMode::Live {
                csv_dir: Some(dir.path().to_path_buf()),
            },
            anchor(),
        )
        .unwrap();

    // WHEN analyzed without an Alpha Vantage key
    let analysis = analyze(&chain, "GLD", Timeframe::OneDay, &settings.engine).unwrap();

    // THEN the CSV import answered
    assert_eq!(analysis.source, DataSource::CsvImport);
    assert_eq!(analysis.bar_count, bars.len());
}

#[test]
fn bdd_scenario_replay_and_export_roundtrip() {
    // GIVEN a bullish synthetic series
    let bars = SyntheticProvider::new(Scenario::Bullish, anchor()).generate("GLD", Timeframe::OneDay);
    let config = EngineConfig::default();

    // WHEN replayed after a 50-bar warmup
    let result = replay(&bars, &config, 50).unwrap();

    // THEN every later prefix is evaluated
    assert_eq!(result.timeline.len(), bars.len() - 49);
    let s = &result.summary;
    assert_eq!(s.buys + s.sells + s.holds, s.evaluated);
    assert!(s.hits + s.stops + s.open <= s.buys + s.sells);
    if let Some(rate) = s.hit_rate {
        assert!((0.0..=1.0).contains(&rate));
    }

    // AND directional points carry levels on the correct side of price
    for p in &result.timeline {
        match (p.signal, p.stop_loss, p.take_profit) {
            (Signal::Buy, Some(sl), Some(tp)) => assert!(sl < p.price && p.price < tp),
            (Signal::Sell, Some(sl), Some(tp)) => assert!(tp < p.price && p.price < sl),
            (Signal::Hold, sl, tp) => assert!(sl.is_none() && tp.is_none()),
            _ => {}
        }
    }

    // WHEN saved to disk and loaded back
    let out = tempfile::tempdir().unwrap();
    let dir = save_replay(&result, "GLD_1d", out.path()).unwrap();
    assert!(dir.join("replay.json").exists());
    let csv = std::fs::read_to_string(dir.join("timeline.csv")).unwrap();
    assert_eq!(csv.lines().count(), result.timeline.len() + 1);
    let loaded = load_replay(&dir).unwrap();

    // THEN nothing was lost
    assert_eq!(loaded.timeline, result.timeline);
    assert_eq!(loaded.summary, result.summary);
    assert_eq!(loaded.final_report, result.final_report);
}

#[test]
fn bdd_scenario_future_schema_is_rejected() {
    // GIVEN an exported replay with a schema version from the future
    let bars = SyntheticProvider::new(Scenario::Demo, anchor()).generate("GLD", Timeframe::OneDay);
    let mut result = replay(&bars, &EngineConfig::default(), 90).unwrap();
    result.schema_version = 99;
    let json = replay_json(&result).unwrap();

    // WHEN it is imported
    let err = import_replay_json(&json).unwrap_err();

    // THEN the version is named in the error
    assert!(err.to_string().contains("unsupported schema version 99"));
}
