use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sales_dashboard::config::Config;
use sales_dashboard::core::{
    ALL_SELLERS, Filter, Period, Session, Widget, aggregate, compute_metrics_now, filter,
    recent_daily_trend, summarize, top_products_by_revenue,
};
use sales_dashboard::export::{self, ExportFormat};
use sales_dashboard::{import, report};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sales-dashboard", about = "Track and analyse shop sales")]
struct Cli {
    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// CSV or JSON file used to seed the session
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Query(QueryCommand),
    /// Start an interactive session
    Shell,
}

#[derive(Args, Debug, Clone, Default)]
struct DateRange {
    #[arg(long)]
    start: Option<NaiveDate>,
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    #[command(flatten)]
    range: DateRange,
    /// Seller name, or "All"
    #[arg(long)]
    seller: Option<String>,
    /// Filter expression such as "date:2024-01-01..2024-01-31 seller:Ravi"
    #[arg(long)]
    query: Option<Filter>,
}

impl FilterArgs {
    /// Explicit flags take precedence over the query expression.
    fn to_filter(&self) -> Filter {
        let base = self.query.clone().unwrap_or_default();
        Filter::new(
            self.range.start.or(base.start),
            self.range.end.or(base.end),
            self.seller.clone().or(base.seller),
        )
    }
}

#[derive(Subcommand, Debug, Clone)]
enum QueryCommand {
    /// Show the business dashboard
    Dashboard,
    /// List transactions with summary totals
    List(FilterArgs),
    /// Revenue, quantity and transaction counts per period
    Analytics {
        #[arg(long, default_value_t = Period::Daily, ignore_case = true)]
        period: Period,
        #[command(flatten)]
        range: DateRange,
    },
    /// Export transactions to a CSV or XLSX file
    Export {
        #[arg(long, default_value = "csv", ignore_case = true)]
        format: ExportFormat,
        #[command(flatten)]
        filter: FilterArgs,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// List the seller choices
    Sellers,
}

#[derive(Parser)]
#[command(no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Record a sale
    Add {
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        product: String,
        /// Price per unit
        #[arg(long)]
        price: Decimal,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        seller: String,
    },
    /// Show or hide a dashboard widget
    Widget {
        name: Widget,
        #[arg(value_parser = parse_toggle, action = clap::ArgAction::Set)]
        visible: bool,
    },
    #[command(flatten)]
    Query(QueryCommand),
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

fn parse_toggle(s: &str) -> Result<bool, String> {
    match s {
        "on" | "show" | "true" => Ok(true),
        "off" | "hide" | "false" => Ok(false),
        other => Err(format!("expected on or off, got {other}")),
    }
}

/// Splits a shell line on whitespace, keeping quoted sections together.
fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_arg = false;
    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_arg = true;
            }
            None if ch.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(ch);
                in_arg = true;
            }
        }
    }
    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

fn init_tracing(default_filter: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_query(
    cmd: &QueryCommand,
    session: &Session,
    cfg: &Config,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let symbol = cfg.currency_symbol.as_str();
    let records = session.snapshot();
    let today = Local::now().date_naive();

    if records.is_empty() && !matches!(cmd, QueryCommand::Sellers) {
        writeln!(
            out,
            "No sales data available yet. Add some transactions to get started!"
        )?;
        return Ok(());
    }

    match cmd {
        QueryCommand::Dashboard => {
            writeln!(out, "{}\n", cfg.shop_name)?;
            let Some(metrics) = compute_metrics_now(records) else {
                writeln!(out, "Unable to calculate metrics. Please check your data.")?;
                return Ok(());
            };
            write!(
                out,
                "{}",
                report::render_metrics(&metrics, &session.preferences(), symbol)
            )?;
            writeln!(out, "\nTop 5 Products by Revenue")?;
            write!(
                out,
                "{}",
                report::render_top_products(&top_products_by_revenue(records, 5), symbol)
            )?;
            writeln!(out, "\nLast 7 Days Sales Trend")?;
            let trend = recent_daily_trend(records, today);
            if trend.is_empty() {
                writeln!(out, "No recent sales data for trend chart")?;
            } else {
                write!(
                    out,
                    "{}",
                    report::render_buckets(Period::Daily, &trend, symbol)
                )?;
            }
        }
        QueryCommand::List(f) => {
            let view = f.to_filter().apply(records);
            if view.is_empty() {
                writeln!(out, "No transactions found for the selected filters.")?;
                return Ok(());
            }
            write!(out, "{}", report::render_summary(&summarize(&view), symbol))?;
            write!(out, "{}", report::render_transactions(&view, symbol))?;
        }
        QueryCommand::Analytics { period, range } => {
            let view = filter(records, range.start, range.end, None);
            if view.is_empty() {
                writeln!(out, "No data available for the selected date range.")?;
                return Ok(());
            }
            writeln!(out, "Sales Analytics ({period})")?;
            write!(
                out,
                "{}",
                report::render_buckets(*period, &aggregate(&view, *period), symbol)
            )?;
        }
        QueryCommand::Export {
            format,
            filter: f,
            out: dir,
        } => {
            let view = f.to_filter().apply(records);
            if view.is_empty() {
                writeln!(
                    out,
                    "No data available for export with the selected filters."
                )?;
                return Ok(());
            }
            let path = export::write_to(dir, *format, &view, Local::now().naive_local())?;
            writeln!(
                out,
                "Exported {} records to {} ({})",
                view.len(),
                path.display(),
                format.mime_type()
            )?;
        }
        QueryCommand::Sellers => {
            writeln!(out, "{ALL_SELLERS}")?;
            for seller in session.store().sellers() {
                writeln!(out, "{seller}")?;
            }
        }
    }
    Ok(())
}

fn run_shell(session: &mut Session, cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut out = std::io::stdout().lock();
    writeln!(out, "{} (type 'help' for commands)", cfg.shop_name)?;
    for line in stdin.lock().lines() {
        let line = line?;
        let args = match split_line(&line) {
            Ok(args) if args.is_empty() => continue,
            Ok(args) => args,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        let parsed = match ShellLine::try_parse_from(args) {
            Ok(parsed) => parsed,
            Err(e) => {
                write!(out, "{e}")?;
                continue;
            }
        };
        match parsed.command {
            ShellCommand::Add {
                date,
                product,
                price,
                quantity,
                seller,
            } => {
                let date = date.unwrap_or_else(|| Local::now().date_naive());
                match session.add_transaction(date, product, price, quantity, seller) {
                    Ok(t) => writeln!(
                        out,
                        "Transaction added: {}",
                        report::format_money(t.total_amount, &cfg.currency_symbol)
                    )?,
                    Err(e) => {
                        warn!(error = %e, "Rejected transaction");
                        writeln!(out, "Please fill all fields with valid values: {e}")?
                    }
                }
            }
            ShellCommand::Widget { name, visible } => {
                session.set_widget(name, visible);
                writeln!(out, "{name}: {}", if visible { "shown" } else { "hidden" })?;
            }
            ShellCommand::Query(cmd) => {
                if let Err(e) = run_query(&cmd, session, cfg, &mut out) {
                    writeln!(out, "error: {e}")?;
                }
            }
            ShellCommand::Quit => break,
        }
    }
    info!(records = session.store().len(), "Session ended");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_or_default(cli.config.as_deref())?;
    init_tracing(&cfg.log_filter);

    let transactions = match cli.data.as_ref().or(cfg.data_file.as_ref()) {
        Some(path) => import::parse_file(path)?,
        None => Vec::new(),
    };
    let mut session = Session::with_transactions(cfg.widgets, transactions);

    match &cli.command {
        Commands::Query(cmd) => {
            let mut out = std::io::stdout().lock();
            run_query(cmd, &session, &cfg, &mut out)?;
        }
        Commands::Shell => run_shell(&mut session, &cfg)?,
    }

    Ok(())
}
