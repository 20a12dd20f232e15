use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use spendlens_client::{ApiClient, Backend, Session};
use spendlens_core::{DashboardState, ManualEntry, count_uncategorized, extract_merchants};
use spendlens_ingest::parse_statement_path;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod report;
mod state;

const ROW_LIMIT: usize = 25;

#[derive(Parser, Debug)]
#[command(
    name = "spendlens",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SPENDLENS_BUILD_SHA"), ")"),
    about = "Categorize bank statements and find savings"
)]
struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a statement locally, without the backend
    Summary {
        #[arg(long)]
        csv: PathBuf,

        /// Categories shown before the rest fold into "Other" (default: 10)
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Upload a statement, refine predictions and fetch savings suggestions
    Upload {
        #[arg(long)]
        csv: PathBuf,

        /// Skip ML refinement and summarize local categories
        #[arg(long)]
        no_ml: bool,

        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,

        /// Show one category (fuzzy-matched against the statement's categories)
        #[arg(long)]
        category: Option<String>,

        /// Correct a prediction, e.g. `--fix 3=Groceries` (repeatable)
        #[arg(long, value_parser = parse_fix)]
        fix: Vec<(usize, String)>,
    },

    /// Add one transaction by hand and submit it with an optional statement
    Add {
        #[arg(long)]
        date: String,

        #[arg(long)]
        description: String,

        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        #[arg(long, default_value = "")]
        category: String,

        /// Existing statement the entry is combined with
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Run the backend's savings analysis over a statement
    Analyze {
        #[arg(long)]
        csv: PathBuf,
    },

    /// List the backend's category labels
    Labels,

    /// Check that the backend is reachable
    Health,

    /// Manage ~/.spendlens/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    All,
    Spending,
    Earning,
}

fn parse_fix(s: &str) -> Result<(usize, String), String> {
    let (index, category) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <index>=<category>, got {s:?}"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad index {index:?}: {e}"))?;
    let category = category.trim();
    if category.is_empty() {
        return Err("category must not be empty".to_string());
    }
    Ok((index, category.to_string()))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("spendlens=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spendlens=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Summary { csv, limit } => summary(csv, limit)?,

        Command::Upload {
            csv,
            no_ml,
            filter,
            category,
            fix,
        } => upload(csv, no_ml, filter, category, fix).await?,

        Command::Add {
            date,
            description,
            amount,
            category,
            csv,
        } => {
            let entry = ManualEntry {
                date,
                description,
                amount,
                category,
            };
            add(entry, csv).await?;
        }

        Command::Analyze { csv } => {
            let mut session = open_session(false)?;
            let rows = parse_statement_path(&csv)?;
            session.state_mut().ingest_rows(rows);
            let analysis = session.analyze().await?;
            report::print_analysis(&analysis);
        }

        Command::Labels => {
            let cfg = config::load_config()?;
            let api = ApiClient::new(cfg.api.base_url.clone(), cfg.timeout())?;
            for label in api.labels().await? {
                println!("{label}");
            }
        }

        Command::Health => {
            let cfg = config::load_config()?;
            let api = ApiClient::new(cfg.api.base_url.clone(), cfg.timeout())?;
            let status = api
                .health()
                .await
                .with_context(|| format!("backend at {} is not reachable", api.base_url()))?;
            println!("{}: {status}", api.base_url());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config(&config::load_config()?)?,
        },
    }

    Ok(())
}

fn open_session(no_ml: bool) -> Result<Session<ApiClient>> {
    let cfg = config::load_config()?;
    let mut settings = cfg.settings();
    if no_ml {
        settings.use_ml = false;
    }
    info!(base_url = %cfg.api.base_url, use_ml = settings.use_ml, "opening session");
    let api = ApiClient::new(cfg.api.base_url.clone(), cfg.timeout())?;
    Session::new(api, settings)
}

fn summary(csv: PathBuf, limit: usize) -> Result<()> {
    let rows = parse_statement_path(&csv)?;
    let cfg = config::load_config()?;
    let mut settings = cfg.settings();
    settings.chart_top_n = limit;
    let merchant_limit = settings.merchant_limit;

    let mut state = DashboardState::new(settings)?;
    state.ingest_rows(rows);

    println!(
        "Parsed {} transactions from {} ({} uncategorized)\n",
        state.entries().len(),
        csv.display(),
        count_uncategorized(state.entries())
    );
    report::print_summary("Categories", &state.effective_summary());

    let merchants = extract_merchants(state.entries(), merchant_limit)?;
    if !merchants.is_empty() {
        println!("## Frequent merchants\n\n{}\n", merchants.join(", "));
    }
    Ok(())
}

async fn upload(
    csv: PathBuf,
    no_ml: bool,
    filter: FilterArg,
    category: Option<String>,
    fixes: Vec<(usize, String)>,
) -> Result<()> {
    let (name, bytes) = state::read_statement(&csv)?;
    let mut session = open_session(no_ml)?;
    session.load_labels().await;

    if !session.upload_csv(&name, bytes).await {
        bail!("upload of {} failed (is the backend running? try: spendlens health)", csv.display());
    }
    session.settle().await;

    for (index, cat) in &fixes {
        if !session.fix_category(*index, cat) {
            println!("No predicted row #{index}; skipped fix to {cat}");
        }
    }
    session.settle().await;

    let dash = session.state_mut();
    match filter {
        FilterArg::All => {}
        FilterArg::Spending => dash.select_spending(),
        FilterArg::Earning => dash.select_earning(),
    }
    if let Some(cat) = category.as_deref() {
        dash.click_category(Some(cat));
    }

    let dash = session.state();
    report::print_rows("Transactions", &dash.filtered_rows(), ROW_LIMIT);
    report::print_summary("Categories", &dash.filtered_summary());
    report::print_review_queue(&dash.review_queue());
    report::print_savings(dash.savings());
    Ok(())
}

async fn add(entry: ManualEntry, csv: Option<PathBuf>) -> Result<()> {
    let mut session = open_session(false)?;
    if let Some(path) = csv {
        let rows = parse_statement_path(&path)?;
        session.state_mut().ingest_rows(rows);
    }

    if !session.add_manual_entry(entry).await {
        bail!("entry not submitted: date, description and amount are required and the backend must be reachable");
    }
    session.settle().await;

    let dash = session.state();
    println!("Submitted {} transactions\n", dash.entries().len());
    report::print_summary("Categories", &dash.effective_summary());
    report::print_savings(dash.savings());
    Ok(())
}
