//! Folio CLI — download, value, stats, and rank commands.
//!
//! Commands:
//! - `download` — fetch adjusted closes from Yahoo Finance (or generate
//!   synthetic data) into the per-symbol CSV store
//! - `value` — build a user's portfolio value series and persist it
//! - `stats` — compute per-instrument statistics and upsert the metrics store
//! - `rank` — print the leaderboard for a window, excluding the caller

mod config;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::FolioConfig;
use folio_board::{
    normalized_return, rank_from_store, CsvPortfolioStore, JsonMetricsStore, MetricsStore,
    PortfolioStore, RankWindow,
};
use folio_core::{
    date_range, download_symbols, load_matrix, synthetic_series, value_portfolio, CsvPriceStore,
    InstrumentStats, PriceStore, StdoutProgress, ValueSeries, YahooProvider,
};

#[derive(Parser)]
#[command(name = "folio", about = "Folio CLI — portfolio valuation and ranking")]
struct Cli {
    /// Path to a TOML config file. Defaults to ./folio.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download adjusted-close history into the price store.
    Download {
        /// Symbols to download (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to one year ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Generate deterministic synthetic data instead of fetching.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Value a user's portfolio and persist the result.
    Value {
        /// User to value and store under.
        #[arg(long)]
        user: String,

        /// Portfolio symbols, in allocation order.
        #[arg(long, value_delimiter = ',', required = true)]
        symbols: Vec<String>,

        /// Allocation fractions aligned to --symbols; must sum to 1.0.
        #[arg(long, value_delimiter = ',', required = true)]
        allocations: Vec<f64>,

        /// Starting capital. Defaults to the configured start value.
        #[arg(long)]
        start_value: Option<f64>,

        /// Start date (YYYY-MM-DD). Defaults to one year ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,
    },
    /// Compute instrument statistics and store them.
    Stats {
        /// Symbols to compute. Defaults to every symbol in the price store.
        symbols: Vec<String>,
    },
    /// Print the leaderboard, excluding the calling user.
    Rank {
        /// Calling user (excluded from the board, compared against it).
        #[arg(long)]
        user: String,

        /// Window: "full" or "weekly".
        #[arg(long, default_value = "full")]
        window: String,

        /// Use a trailing window of exactly N observations instead.
        #[arg(long)]
        trailing: Option<usize>,

        /// Board size. Defaults to the configured top-k.
        #[arg(long)]
        top_k: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FolioConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Download {
            symbols,
            start,
            end,
            synthetic,
        } => run_download(&config, symbols, start, end, synthetic),
        Commands::Value {
            user,
            symbols,
            allocations,
            start_value,
            start,
            end,
        } => run_value(&config, &user, symbols, allocations, start_value, start, end),
        Commands::Stats { symbols } => run_stats(&config, symbols),
        Commands::Rank {
            user,
            window,
            trailing,
            top_k,
        } => run_rank(&config, &user, &window, trailing, top_k),
    }
}

fn parse_date(value: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)")),
        None => Ok(default),
    }
}

fn default_range(start: Option<&str>, end: Option<&str>) -> Result<(NaiveDate, NaiveDate)> {
    let today = chrono::Local::now().date_naive();
    let start_date = parse_date(start, today - chrono::Duration::days(365))?;
    let end_date = parse_date(end, today)?;
    if start_date > end_date {
        bail!("start date {start_date} is after end date {end_date}");
    }
    Ok((start_date, end_date))
}

fn run_download(
    config: &FolioConfig,
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    synthetic: bool,
) -> Result<()> {
    let (start_date, end_date) = default_range(start.as_deref(), end.as_deref())?;
    let store = CsvPriceStore::new(&config.data_dir);

    if synthetic {
        eprintln!("WARNING: generating synthetic data — not market prices");
        for symbol in &symbols {
            let series = synthetic_series(symbol, start_date, end_date);
            store
                .write(&series)
                .with_context(|| format!("failed to store synthetic series for {symbol}"))?;
            println!("  OK: {symbol} ({} rows)", series.len());
        }
        return Ok(());
    }

    let provider = YahooProvider::new();
    let sym_refs: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
    let summary = download_symbols(
        &provider,
        &store,
        &sym_refs,
        start_date,
        end_date,
        &StdoutProgress,
    );

    if !summary.all_succeeded() {
        for (symbol, err) in &summary.errors {
            eprintln!("Error for {symbol}: {err}");
        }
        std::process::exit(1);
    }
    Ok(())
}

fn run_value(
    config: &FolioConfig,
    user: &str,
    symbols: Vec<String>,
    allocations: Vec<f64>,
    start_value: Option<f64>,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    if symbols.len() != allocations.len() {
        bail!(
            "{} symbols but {} allocations",
            symbols.len(),
            allocations.len()
        );
    }
    // Boundary validation: the engine takes weights as given, so the sum
    // check lives here.
    let total: f64 = allocations.iter().sum();
    if (total - 1.0).abs() > 1e-6 {
        bail!("allocations must sum to 1.0 (got {total})");
    }
    let start_value = start_value.unwrap_or(config.start_value);
    if !(start_value.is_finite() && start_value > 0.0) {
        bail!("start value must be positive (got {start_value})");
    }

    let (start_date, end_date) = default_range(start.as_deref(), end.as_deref())?;
    let dates = date_range(start_date, end_date);

    let price_store = CsvPriceStore::new(&config.data_dir);
    let matrix = load_matrix(&price_store, &symbols, &dates)?;
    let portfolio = value_portfolio(&matrix, &allocations, start_value)?;

    let portfolio_store = CsvPortfolioStore::new(&config.portfolio_dir);
    portfolio_store.put(user, &portfolio)?;

    print_value_summary(user, &symbols, &portfolio);
    Ok(())
}

fn run_stats(config: &FolioConfig, symbols: Vec<String>) -> Result<()> {
    let price_store = CsvPriceStore::new(&config.data_dir);
    let metrics_store = JsonMetricsStore::new(&config.metrics_dir);

    let symbols = if symbols.is_empty() {
        price_store.list_symbols()?
    } else {
        symbols
    };
    if symbols.is_empty() {
        bail!("no symbols given and the price store is empty");
    }

    println!(
        "{:<8} {:>10} {:>10} {:>10} {:>8} {:>8}",
        "Symbol", "CumRet", "AvgDaily", "Vol", "Sharpe", "Sortino"
    );
    println!("{}", "-".repeat(60));

    let mut failed = 0;
    for symbol in &symbols {
        let result = price_store
            .load(symbol)
            .map_err(anyhow::Error::from)
            .and_then(|series| InstrumentStats::compute(&series).map_err(anyhow::Error::from));
        match result {
            Ok(stats) => {
                metrics_store.upsert(symbol, &stats)?;
                println!(
                    "{:<8} {:>9.2}% {:>9.4}% {:>9.4}% {:>8.3} {:>8.3}",
                    symbol,
                    stats.cumulative_return * 100.0,
                    stats.average_daily_return * 100.0,
                    stats.volatility * 100.0,
                    stats.sharpe_ratio,
                    stats.sortino_ratio,
                );
            }
            Err(e) => {
                eprintln!("{symbol}: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("\n{failed} symbol(s) failed");
        std::process::exit(1);
    }
    Ok(())
}

fn run_rank(
    config: &FolioConfig,
    user: &str,
    window: &str,
    trailing: Option<usize>,
    top_k: Option<usize>,
) -> Result<()> {
    let rank_window = match (trailing, window) {
        (Some(n), _) => RankWindow::Trailing(n),
        (None, "full") => RankWindow::Full,
        (None, "weekly") => RankWindow::Trailing(config.weekly_window),
        (None, other) => bail!("unknown window '{other}' (expected 'full' or 'weekly')"),
    };
    let top_k = top_k.unwrap_or(config.top_k);

    let store = CsvPortfolioStore::new(&config.portfolio_dir);
    let board = rank_from_store(&store, user, rank_window, top_k)?;

    let label = match rank_window {
        RankWindow::Full => "full history".to_string(),
        RankWindow::Trailing(n) => format!("trailing {n}"),
    };
    println!("Leaderboard ({label}):");
    if board.is_empty() {
        println!("  (no rankable portfolios)");
    }
    for (i, entry) in board.iter().enumerate() {
        println!(
            "{:>3}. {:<16} {:>+8.2}%",
            i + 1,
            entry.user_id,
            (entry.normalized_return - 1.0) * 100.0
        );
    }

    match store.get(user) {
        Ok(series) => print_caller_comparison(user, &series, rank_window, &board),
        Err(_) => println!("\n(no stored portfolio for '{user}' to compare)"),
    }
    Ok(())
}

fn print_caller_comparison(
    user: &str,
    series: &ValueSeries,
    window: RankWindow,
    board: &[folio_board::LeaderboardEntry],
) {
    let Some(mine) = normalized_return(series, window) else {
        println!("\n(stored portfolio for '{user}' is not rankable)");
        return;
    };
    let beaten = board
        .iter()
        .filter(|e| mine > e.normalized_return)
        .count();
    println!(
        "\nYou ({user}): {:>+.2}% — ahead of {beaten} of the top {}",
        (mine - 1.0) * 100.0,
        board.len()
    );
}

fn print_value_summary(user: &str, symbols: &[String], portfolio: &ValueSeries) {
    println!();
    println!("=== Portfolio Valuation ===");
    println!("User:       {user}");
    println!("Symbols:    {}", symbols.join(", "));
    if let (Some(first), Some(last)) = (portfolio.first(), portfolio.last()) {
        println!("Period:     {} to {}", first.date, last.date);
        println!("Rows:       {}", portfolio.len());
        println!("Start:      {:.3}", first.value);
        println!("End:        {:.3}", last.value);
        println!(
            "Return:     {:>+.2}%",
            (last.value / first.value - 1.0) * 100.0
        );
    }
    println!();
}
