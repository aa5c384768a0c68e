//! Aurum CLI — gold signal analysis from the command line.
//!
//! Commands:
//! - `quick`: analyze one timeframe and print the signal report
//! - `multi`: analyze all timeframes and print the consensus
//! - `backtest`: replay the engine over history, optionally exporting artifacts
//! - `info`: show the effective configuration and data sources

use anyhow::{Context, Result};
use aurum_core::data::{DataProvider, FallbackChain, Scenario};
use aurum_core::{SignalReport, Timeframe};
use aurum_runner::settings::API_KEY_ENV;
use aurum_runner::{
    analyze, analyze_timeframes, replay, report_json, save_replay, Analysis, AnalyzerSettings,
    MultiTimeframeAnalysis, ReplayResult, SourceMode,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "aurum", about = "Aurum: gold trading signal analyzer")]
struct Cli {
    /// Path to a TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use synthetic demo data only (no network access).
    #[arg(long, global = true, default_value_t = false)]
    demo: bool,

    /// Synthetic scenario used with --demo: demo, bullish, bearish, sideways.
    #[arg(long, global = true, default_value = "demo")]
    scenario: Scenario,

    /// Directory of `{symbol}_{timeframe}.csv` files to use as a data source.
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    /// Symbol to analyze. Overrides the settings file.
    #[arg(long, global = true)]
    symbol: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single timeframe.
    Quick {
        /// Timeframe: 1d, 2d or 5d.
        #[arg(default_value = "1d")]
        timeframe: Timeframe,

        /// Print the report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyze every timeframe and report the consensus.
    Multi,
    /// Replay the engine over the fetched history.
    Backtest {
        /// Timeframe: 1d, 2d or 5d.
        #[arg(default_value = "1d")]
        timeframe: Timeframe,

        /// Bars to accumulate before the first evaluation.
        #[arg(long, default_value_t = 50)]
        warmup: usize,

        /// Directory to write replay.json and timeline.csv into.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Show the effective configuration and data sources.
    Info,
}

fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.log_json);

    let mut settings = match &cli.config {
        Some(path) => AnalyzerSettings::from_file(path)?,
        None => AnalyzerSettings::default(),
    };
    settings.apply_env();
    if let Some(symbol) = &cli.symbol {
        settings.symbol = symbol.clone();
    }

    let mode = if cli.demo {
        SourceMode::Demo(cli.scenario)
    } else {
        SourceMode::Live {
            csv_dir: cli.csv_dir.clone(),
        }
    };
    let chain = settings.build_chain(&mode, chrono::Utc::now())?;
    tracing::info!(
        symbol = %settings.symbol,
        providers = ?chain.provider_names(),
        "data sources selected"
    );

    match cli.command {
        Commands::Quick { timeframe, json } => run_quick(&settings, &chain, timeframe, json),
        Commands::Multi => run_multi(&settings, &chain),
        Commands::Backtest {
            timeframe,
            warmup,
            export,
        } => run_backtest(&settings, &chain, timeframe, warmup, export),
        Commands::Info => run_info(&settings, &chain, &mode),
    }
}

/// Logs go to stderr so stdout stays clean for reports and JSON.
fn init_logging(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn run_quick(
    settings: &AnalyzerSettings,
    chain: &FallbackChain,
    timeframe: Timeframe,
    json: bool,
) -> Result<()> {
    let analysis = analyze(chain, &settings.symbol, timeframe, &settings.engine)?;
    if json {
        println!("{}", report_json(&analysis.report)?);
    } else {
        print_analysis(&analysis);
    }
    Ok(())
}

fn run_multi(settings: &AnalyzerSettings, chain: &FallbackChain) -> Result<()> {
    let multi = analyze_timeframes(chain, &settings.symbol, &Timeframe::ALL, &settings.engine);
    print_multi(&multi);
    Ok(())
}

fn run_backtest(
    settings: &AnalyzerSettings,
    chain: &FallbackChain,
    timeframe: Timeframe,
    warmup: usize,
    export: Option<PathBuf>,
) -> Result<()> {
    let fetched = chain
        .fetch(&settings.symbol, timeframe)
        .with_context(|| format!("failed to fetch {} ({timeframe})", settings.symbol))?;
    let result = replay(&fetched.bars, &settings.engine, warmup)
        .with_context(|| format!("replay failed for {} ({timeframe})", settings.symbol))?;

    print_replay(&settings.symbol, timeframe, &fetched.source.to_string(), &result);

    if let Some(dir) = export {
        let label = format!("{}_{}", settings.symbol, timeframe);
        let run_dir = save_replay(&result, &label, &dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn run_info(settings: &AnalyzerSettings, chain: &FallbackChain, mode: &SourceMode) -> Result<()> {
    println!("=== Aurum Configuration ===");
    println!("Symbol:         {}", settings.symbol);
    println!("Fingerprint:    {}", settings.engine.fingerprint());
    println!(
        "Timeframes:     {}",
        Timeframe::ALL
            .iter()
            .map(|tf| format!("{tf} ({})", tf.interval_label()))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();
    println!("--- Data Sources ---");
    match mode {
        SourceMode::Demo(scenario) => println!("Mode:           demo ({scenario})"),
        SourceMode::Live { .. } => println!("Mode:           live"),
    }
    println!("Chain:          {}", chain.provider_names().join(" -> "));
    let key = if settings.data.alpha_vantage_api_key.is_some() {
        "configured"
    } else {
        "not set"
    };
    println!("API key:        {key} (env {API_KEY_ENV})");
    println!("Min bars:       {}", settings.data.min_bars);
    println!();
    println!("--- Engine ---");
    let toml = settings
        .engine
        .to_toml()
        .context("failed to render engine configuration")?;
    print!("{toml}");
    Ok(())
}

// ─── Text rendering ─────────────────────────────────────────────────

fn print_report(report: &SignalReport) {
    println!(
        "Signal:         {} ({})",
        report.signal(),
        report.recommendation()
    );
    println!("Strength:       {:.2}/10", report.strength());
    println!("Confidence:     {:.2}/10", report.confidence());
    println!("Price:          {:.2}", report.price);
    println!("Time:           {}", report.timestamp.to_rfc3339());
    match report.atr {
        Some(atr) => println!("ATR:            {atr:.4}"),
        None => println!("ATR:            n/a"),
    }
    println!();
    println!("--- Indicators ---");
    for reading in report.readings() {
        println!(
            "{:<20} {:<5} {:>5.2}  {}",
            reading.name,
            reading.signal.to_string(),
            reading.strength,
            reading.rationale
        );
    }
    if let Some(risk) = &report.risk {
        println!();
        println!("--- Risk ---");
        println!("Stop Loss:      {:.2}", risk.stop_loss);
        println!("Take Profit:    {:.2}", risk.take_profit);
        println!("Risk:           {:.2}", risk.risk_amount);
        println!("Reward:         {:.2}", risk.reward_amount);
        println!("Risk/Reward:    {}", risk.ratio_label());
    }
}

fn print_analysis(analysis: &Analysis) {
    println!();
    println!(
        "=== {} {} ({} bars, {}) ===",
        analysis.symbol, analysis.timeframe, analysis.bar_count, analysis.source
    );
    print_report(&analysis.report);
    println!();
}

fn print_multi(multi: &MultiTimeframeAnalysis) {
    println!();
    println!("=== {} multi-timeframe ===", multi.symbol);
    for outcome in &multi.outcomes {
        match &outcome.result {
            Ok(a) => println!(
                "{:<4} {:<5} {:<12} strength {:>5.2}  confidence {:>5.2}  ({})",
                outcome.timeframe.to_string(),
                a.report.signal().to_string(),
                a.report.recommendation().to_string(),
                a.report.strength(),
                a.report.confidence(),
                a.source
            ),
            Err(e) => println!("{:<4} error: {e:#}", outcome.timeframe.to_string()),
        }
    }
    println!();
    println!("Consensus:      {}", multi.consensus);
    println!();
}

fn print_replay(symbol: &str, timeframe: Timeframe, source: &str, result: &ReplayResult) {
    let s = &result.summary;
    println!();
    println!("=== Replay {symbol} {timeframe} ===");
    println!("Source:         {source}");
    println!(
        "Bars:           {} ({} warmup)",
        result.bar_count, result.warmup
    );
    println!("Evaluations:    {}", s.evaluated);
    println!(
        "Signals:        {} BUY / {} SELL / {} HOLD",
        s.buys, s.sells, s.holds
    );
    println!();
    println!("--- Outcomes ---");
    println!("Take Profit:    {}", s.hits);
    println!("Stop Loss:      {}", s.stops);
    println!("Open:           {}", s.open);
    match s.hit_rate {
        Some(rate) => println!("Hit Rate:       {:.1}%", rate * 100.0),
        None => println!("Hit Rate:       n/a"),
    }
    println!();
    println!("--- Latest ---");
    let m = &result.final_metrics;
    println!("Signal:         {} ({})", m.signal, m.recommendation);
    println!("Strength:       {:.2}/10", m.strength);
    println!("Confidence:     {:.2}/10", m.confidence);
    if let (Some(risk), Some(reward)) = (m.potential_risk, m.potential_reward) {
        println!("Potential Risk: {risk:.2}");
        println!("Potential Gain: {reward:.2}");
    }
    if let Some(ratio) = m.risk_reward_ratio {
        println!("Risk/Reward:    {ratio:.2}:1");
    }
    println!();
}
