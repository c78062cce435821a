use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use visualcents_core::{Budget, BudgetPeriod, Calendar, Category, Transaction};
use visualcents_finance::{
    BudgetTracker, PeriodAggregator, PeriodSummary, SpendingTrend, StatsPeriod, category_breakdown,
    daily_spending, filter_period,
};
use visualcents_ingest::{ReceiptExtractor, decode_response, evaluate, parse_ledger_csv};

mod config;
mod render;
mod state;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VISUALCENTS_BUILD_SHA"), ")");

/// Days covered by the spending trend in `stats`.
const TREND_DAYS: u32 = 7;

#[derive(Parser, Debug)]
#[command(name = "visualcents", version = VERSION, about = "VisualCents bookkeeping tools")]
struct Cli {
    /// IANA timezone for day boundaries (overrides config)
    #[arg(long, global = true)]
    tz: Option<String>,

    /// First day of the week, e.g. monday or sunday (overrides config)
    #[arg(long, global = true)]
    week_start: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract merchant, amount and date from OCR output
    Scan {
        /// Plain recognised text
        #[arg(long, conflicts_with = "response", required_unless_present = "response")]
        text: Option<PathBuf>,

        /// Raw JSON response from the OCR service
        #[arg(long)]
        response: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// OCR service helpers
    Ocr {
        #[command(subcommand)]
        command: OcrCommand,
    },

    /// Month grid with daily totals
    Calendar {
        #[arg(long)]
        csv: PathBuf,

        /// Month as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Days with activity, newest first
    Timeline {
        #[arg(long)]
        csv: PathBuf,

        /// Number of days to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// The seven dates of a week
    Week {
        /// Any date in the week (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Progress against a spending limit
    Budget {
        #[arg(long)]
        csv: PathBuf,

        #[arg(long)]
        limit: Decimal,

        #[arg(long, default_value_t = BudgetPeriod::Monthly)]
        period: BudgetPeriod,

        /// Only count this category id
        #[arg(long)]
        category: Option<String>,

        /// Evaluate as of this date (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Income/expense summary, category breakdown and trend
    Stats {
        #[arg(long)]
        csv: PathBuf,

        #[arg(long, default_value_t = StatsPeriod::Month)]
        period: StatsPeriod,

        /// Date inside the period (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Evaluate a keypad expression such as 12.5+7.5-5
    Calc {
        #[arg(allow_hyphen_values = true)]
        expr: String,
    },

    /// Manage ~/.visualcents/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum OcrCommand {
    /// Print the signed request for an image as JSON
    Prepare {
        #[arg(long)]
        image: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn init_tracing() {
    let log_format = std::env::var("VISUALCENTS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let cfg = config::load_config()?.with_overrides(cli.tz.as_deref(), cli.week_start.as_deref());

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg.redacted())?);
                Ok(())
            }
        },
        command => run(command, &cfg),
    }
}

fn run(command: Command, cfg: &config::Config) -> Result<()> {
    let calendar = cfg.calendar()?;
    debug!(tz = %calendar.tz(), week_start = ?calendar.week_start(), "calendar");

    match command {
        Command::Scan { text, response, json } => {
            let raw = match (text, response) {
                (Some(path), _) => read_text(&path)?,
                (None, Some(path)) => {
                    let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
                    decode_response(&bytes).with_context(|| format!("decode {}", path.display()))?
                }
                (None, None) => bail!("pass --text or --response"),
            };
            let receipt = ReceiptExtractor::with_calendar(calendar)?.extract(&raw);
            if !receipt.is_complete() {
                warn!(missing = ?receipt.missing_fields(), "receipt is incomplete");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                print!("{}", render::receipt(&receipt));
            }
        }

        Command::Ocr { command } => match command {
            OcrCommand::Prepare { image } => {
                let bytes = std::fs::read(&image).with_context(|| format!("read {}", image.display()))?;
                let nonce = uuid::Uuid::new_v4().to_string();
                let request = cfg
                    .ocr_builder()
                    .prepare(&bytes, Utc::now(), &nonce)
                    .context("prepare OCR request (set [ocr] access_key_id/access_key_secret)")?;
                info!(url = %request.url, bytes = bytes.len(), "prepared OCR request");
                println!("{}", serde_json::to_string_pretty(&request)?);
            }
        },

        Command::Calendar { csv, month } => {
            let txns = load_ledger(&csv, &calendar)?;
            let (year, month) = match month {
                Some(m) => parse_month(&m)?,
                None => {
                    let today = calendar.today();
                    (today.year(), today.month())
                }
            };
            let data = PeriodAggregator::new(calendar).month_data(year, month, &txns)?;
            print!("{}", render::month(&data));
        }

        Command::Timeline { csv, limit } => {
            let txns = load_ledger(&csv, &calendar)?;
            let mut buckets = PeriodAggregator::new(calendar).timeline(&txns);
            if let Some(limit) = limit {
                buckets.truncate(limit);
            }
            print!("{}", render::timeline(&calendar, &buckets));
        }

        Command::Week { date } => {
            let today = calendar.today();
            let dates = PeriodAggregator::new(calendar).week_dates(date.unwrap_or(today));
            print!("{}", render::week(&dates, today));
        }

        Command::Budget {
            csv,
            limit,
            period,
            category,
            date,
        } => {
            let txns = load_ledger(&csv, &calendar)?;
            let mut budget = Budget::new("cli", limit, period);
            if let Some(category) = category {
                budget = budget.for_category(category);
            }
            let now = as_of(&calendar, date);
            let status = BudgetTracker::new(calendar).status_at(&budget, &txns, now);
            print!("{}", render::budget(&status));
        }

        Command::Stats { csv, period, date } => {
            let txns = load_ledger(&csv, &calendar)?;
            let selected = date.unwrap_or_else(|| calendar.today());
            let in_period = filter_period(&calendar, period, selected, &txns);
            let summary = PeriodSummary::of(in_period.iter().copied());
            let breakdown = category_breakdown(in_period, &Category::defaults());
            let trend = SpendingTrend::from_points(&daily_spending(&calendar, &txns, selected, TREND_DAYS));
            print!("{}", render::stats(&summary, &breakdown, &trend, TREND_DAYS));
        }

        Command::Calc { expr } => {
            println!("{}", evaluate(&expr));
        }

        Command::Config { .. } => {}
    }

    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn load_ledger(path: &Path, calendar: &Calendar) -> Result<Vec<Transaction>> {
    if !path.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", path.display());
    }
    let txns = parse_ledger_csv(path, calendar)?;
    info!(count = txns.len(), path = %path.display(), "loaded ledger");
    Ok(txns)
}

/// Noon of `date` in the calendar's zone, or now.
fn as_of(calendar: &Calendar, date: Option<NaiveDate>) -> DateTime<Utc> {
    match date {
        Some(d) => {
            let start = calendar.day_start(d);
            start.checked_add_signed(chrono::Duration::hours(12)).unwrap_or(start)
        }
        None => Utc::now(),
    }
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

/// `YYYY-MM`; range checking is left to the month grid.
fn parse_month(s: &str) -> Result<(i32, u32)> {
    let (y, m) = s
        .trim()
        .split_once('-')
        .with_context(|| format!("expected YYYY-MM, got '{s}'"))?;
    let year = y.parse().with_context(|| format!("bad year in '{s}'"))?;
    let month = m.parse().with_context(|| format!("bad month in '{s}'"))?;
    Ok((year, month))
}
