//! Bonus-bet arbitrage engine entry point.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bonus_arb::api::{create_router, AppState};
use bonus_arb::arbitrage::{find_opportunities, ArbitrageCalculator, ArbitrageResult};
use bonus_arb::bet::{BonusLeg, HedgeLeg};
use bonus_arb::config::Config;
use bonus_arb::metrics;
use bonus_arb::report;
use bonus_arb::storage;
use bonus_arb::summary::{summarize_scan, OpportunityAggregator, ScanRecord, WeeklySummary};
use bonus_arb::utils::{parse_timestamp, shutdown_signal};

/// Bonus-bet arbitrage valuation and weekly opportunity aggregation.
#[derive(Parser, Debug)]
#[command(name = "bonus-arb")]
#[command(about = "Value sportsbook bonus hedges and summarize opportunities")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Value a single bonus/hedge pairing.
    Evaluate {
        /// Sportsbook holding the bonus.
        #[arg(long)]
        bonus_book: String,

        /// Selection backed with the bonus.
        #[arg(long)]
        bonus_selection: String,

        /// American odds of the bonus selection.
        #[arg(long, allow_hyphen_values = true)]
        bonus_odds: i32,

        /// Bonus credit amount.
        #[arg(long)]
        bonus_amount: Decimal,

        /// Sportsbook taking the hedge.
        #[arg(long)]
        hedge_book: String,

        /// Opposing selection backed with real money.
        #[arg(long)]
        hedge_selection: String,

        /// American odds of the hedge selection.
        #[arg(long, allow_hyphen_values = true)]
        hedge_odds: i32,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Evaluate every pairing in an odds snapshot.
    Scan {
        /// JSON array of odds quotes.
        #[arg(long)]
        quotes: PathBuf,

        /// JSON array of bonus offers.
        #[arg(long)]
        offers: PathBuf,

        /// Write evaluated results here as scan records.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Guaranteed profit a result must exceed to be listed.
        #[arg(long)]
        min_profit: Option<Decimal>,

        /// Print the scan outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Summarize stored scan records over a trailing window.
    Summarize {
        /// Scan record files (repeatable).
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// End of the window (RFC 3339); defaults to now.
        #[arg(long, value_parser = parse_timestamp)]
        as_of: Option<OffsetDateTime>,

        /// Window length in days.
        #[arg(long)]
        window_days: Option<u32>,

        /// Size of the top-opportunities list.
        #[arg(long)]
        top_n: Option<usize>,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Render a markdown report.
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Serve the HTTP API.
    Serve {
        /// HTTP server port.
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand, Debug)]
enum ReportKind {
    /// Bets to place now, from the latest scan records.
    BetsNow {
        /// Scan record files (repeatable).
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// Number of bets to list.
        #[arg(long)]
        top_n: Option<usize>,

        /// Guaranteed profit a result must exceed to be listed.
        #[arg(long)]
        min_profit: Option<Decimal>,
    },

    /// Rolling weekly view of stored scan records.
    ThisWeek {
        /// Scan record files (repeatable).
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// End of the window (RFC 3339); defaults to now.
        #[arg(long, value_parser = parse_timestamp)]
        as_of: Option<OffsetDateTime>,

        /// Window length in days.
        #[arg(long)]
        window_days: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging on stderr so reports stay clean on stdout
    // Commands that need a valid config report load errors themselves
    let log_config = Config::load().unwrap_or_default();
    let filter = EnvFilter::try_new(log_config.log_directive(args.verbose))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            args.json_logs
                .then(|| fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with((!args.json_logs).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with(filter)
        .init();

    // The clock is read once; everything downstream takes it as input
    let now = OffsetDateTime::now_utc();

    match args.command {
        Command::Evaluate {
            bonus_book,
            bonus_selection,
            bonus_odds,
            bonus_amount,
            hedge_book,
            hedge_selection,
            hedge_odds,
            json,
        } => cmd_evaluate(
            BonusLeg::new(bonus_book, bonus_selection, bonus_odds, bonus_amount),
            HedgeLeg::new(hedge_book, hedge_selection, hedge_odds),
            json,
            now,
        ),
        Command::Scan {
            quotes,
            offers,
            out,
            min_profit,
            json,
        } => cmd_scan(quotes, offers, out, min_profit, json, now),
        Command::Summarize {
            input,
            as_of,
            window_days,
            top_n,
            json,
        } => cmd_summarize(&input, as_of.unwrap_or(now), window_days, top_n, json),
        Command::Report { kind } => cmd_report(kind, now),
        Command::CheckConfig => cmd_check_config(),
        Command::Serve { port } => cmd_serve(port).await,
    }
}

/// Load and validate configuration.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load()?;
    config.validate()?;
    Ok(config)
}

/// Load records from every input file, in order.
fn load_all_records(inputs: &[PathBuf]) -> anyhow::Result<Vec<ScanRecord>> {
    let mut records = Vec::new();
    for path in inputs {
        records.extend(storage::load_records(path)?);
    }
    Ok(records)
}

fn print_result(result: &ArbitrageResult) {
    let bonus = &result.bonus_leg;
    let hedge = &result.hedge_leg;

    println!("======================================================================");
    println!("BONUS HEDGE EVALUATION");
    println!("======================================================================");
    println!(
        "  Bonus: ${} on {} @ {} ({})",
        bonus.bonus_amount,
        bonus.leg.selection,
        bonus.leg.american_odds,
        bonus.sportsbook()
    );
    println!(
        "  Hedge: ${} on {} @ {} ({})",
        result.hedge_stake,
        hedge.leg.selection,
        hedge.leg.american_odds,
        hedge.sportsbook()
    );
    println!("----------------------------------------------------------------------");
    println!("  If {} wins: ${}", bonus.leg.selection, result.profit_if_bonus_wins);
    println!("  If {} wins: ${}", hedge.leg.selection, result.profit_if_hedge_wins);
    println!("  Guaranteed profit: ${}", result.guaranteed_profit);
    println!("  ROI: {}%", result.roi_pct);
    for warning in &result.warnings {
        println!("  WARNING: {:?}", warning);
    }
    println!("======================================================================");
}

/// Value one pairing.
fn cmd_evaluate(
    bonus_leg: BonusLeg,
    hedge_leg: HedgeLeg,
    json: bool,
    now: OffsetDateTime,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let calculator = ArbitrageCalculator::from_config(&config);

    let result = calculator.evaluate(bonus_leg, hedge_leg, now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

/// Scan an odds snapshot against available offers.
fn cmd_scan(
    quotes: PathBuf,
    offers: PathBuf,
    out: Option<PathBuf>,
    min_profit: Option<Decimal>,
    json: bool,
    now: OffsetDateTime,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let calculator = ArbitrageCalculator::from_config(&config);
    let min_profit = min_profit.unwrap_or(config.min_guaranteed_profit);

    let quotes = storage::load_quotes(&quotes)?;
    let offers = storage::load_offers(&offers)?;
    let outcome = find_opportunities(&quotes, &offers, &calculator, now);

    if let Some(path) = &out {
        storage::save_results(path, &outcome.results)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let scan = summarize_scan(&outcome.results);
    println!("======================================================================");
    println!("SCAN SUMMARY");
    println!("======================================================================");
    println!("  Pairings evaluated: {}", scan.total);
    println!("  Profitable: {}", scan.profitable);
    println!("  Total guaranteed profit: ${}", scan.total_guaranteed_profit);
    println!("  Average ROI: {}%", scan.average_roi_pct);
    println!("  Rejected pairings: {}", outcome.rejected.len());
    println!("  Invalid quotes: {}", outcome.invalid_quotes);
    println!("  Invalid offers: {}", outcome.invalid_offers);
    println!("  Skipped events: {}", outcome.skipped_events);
    println!("======================================================================");
    println!();

    let actionable: Vec<ArbitrageResult> = outcome.profitable(min_profit).cloned().collect();
    println!(
        "{}",
        report::bets_now(&actionable, config.top_n, min_profit, now)
    );
    Ok(())
}

fn print_summary(summary: &WeeklySummary) {
    println!("======================================================================");
    println!(
        "{}-DAY SUMMARY AS OF {}",
        summary.window_days, summary.as_of
    );
    println!("======================================================================");
    println!("  Records in window: {}", summary.total_count);
    println!("  Profitable: {}", summary.profitable_count);
    println!("  Success rate: {}%", summary.success_rate);
    println!("  Total guaranteed profit: ${}", summary.total_profit);
    println!("  Total real money at risk: ${}", summary.total_risk);
    println!("  Malformed: {}", summary.skipped_count);
    println!("----------------------------------------------------------------------");
    for day in &summary.daily_stats {
        println!(
            "  {}: {} found, {} profitable, ${} profit, ${} risk",
            day.date, day.total_count, day.profitable_count, day.total_profit, day.total_risk
        );
    }
    println!("======================================================================");
}

/// Summarize stored records.
fn cmd_summarize(
    inputs: &[PathBuf],
    as_of: OffsetDateTime,
    window_days: Option<u32>,
    top_n: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let window_days = window_days.unwrap_or(config.window_days);
    if window_days == 0 {
        anyhow::bail!("--window-days must be at least 1");
    }
    let aggregator = OpportunityAggregator::new(top_n.unwrap_or(config.top_n));

    let records = load_all_records(inputs)?;
    let summary = aggregator.aggregate(&records, as_of, window_days);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Render a markdown report to stdout.
fn cmd_report(kind: ReportKind, now: OffsetDateTime) -> anyhow::Result<()> {
    let config = load_config()?;

    let markdown = match kind {
        ReportKind::BetsNow {
            input,
            top_n,
            min_profit,
        } => {
            let mut results = Vec::new();
            for (index, record) in load_all_records(&input)?.into_iter().enumerate() {
                match record.into_result() {
                    Ok(result) => results.push(result),
                    Err(e) => warn!(index, error = %e, "Skipping malformed record"),
                }
            }
            report::bets_now(
                &results,
                top_n.unwrap_or(config.top_n),
                min_profit.unwrap_or(config.min_guaranteed_profit),
                now,
            )
        }
        ReportKind::ThisWeek {
            input,
            as_of,
            window_days,
        } => {
            let window_days = window_days.unwrap_or(config.window_days);
            if window_days == 0 {
                anyhow::bail!("--window-days must be at least 1");
            }
            let records = load_all_records(&input)?;
            let summary = OpportunityAggregator::from_config(&config).aggregate(
                &records,
                as_of.unwrap_or(now),
                window_days,
            );
            report::this_week(&summary, now)
        }
    };

    println!("{markdown}");
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("BONUS ARB - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Window: {} days", config.window_days);
    println!("  Top N: {}", config.top_n);
    println!("  Max Hedge Multiple: {}x", config.max_hedge_multiple);
    println!("  Min Guaranteed Profit: ${}", config.min_guaranteed_profit);
    println!("  Port: {}", config.port);
    println!("  Log Filter: {}", config.log_directive(false));
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Serve the HTTP API until Ctrl+C.
async fn cmd_serve(port: Option<u16>) -> anyhow::Result<()> {
    let config = load_config()?;
    let port = port.unwrap_or(config.port);

    // Install the recorder before describing metrics
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::init_metrics();

    let app_state = AppState::from_config(&config).with_metrics(handle);
    let router = create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
