use std::path::PathBuf;

use anyhow::Context;
use budgetly_core::TransactionType;
use budgetly_ocr::ScanConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "budgetly", version, about = "Pull the total out of a receipt")]
struct Cli {
    /// Config file (defaults to the per-user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the total in already-recognized receipt text.
    Extract {
        /// Text file to read; stdin when omitted.
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Run OCR on a receipt image or PDF and find its total.
    Scan {
        file: PathBuf,
        /// Print the recognized text as well.
        #[arg(long)]
        show_text: bool,
        #[arg(long)]
        json: bool,
        /// Build a transaction with this title from the scanned amount.
        #[arg(long)]
        title: Option<String>,
        #[arg(long, requires = "title")]
        category_id: Option<i64>,
        /// Transaction type: income or expense.
        #[arg(long = "type", value_name = "TYPE", default_value_t = TransactionType::Expense, requires = "title")]
        kind: TransactionType,
    },
    /// Print the effective configuration.
    Config,
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "budgetly", "Budgetly")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<ScanConfig> {
    match explicit {
        Some(path) => ScanConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => match default_config_path() {
            Some(path) => ScanConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(ScanConfig::default()),
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable with --json.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Command::Extract { file, json } => commands::extract(file.as_deref(), json),
        Command::Scan { file, show_text, json, title, category_id, kind } => {
            let draft = title.map(|title| commands::DraftArgs { title, category_id, kind });
            commands::scan(config, &file, show_text, json, draft).await
        }
        Command::Config => {
            print!("{}", toml::to_string(&config).context("Failed to serialize config")?);
            Ok(())
        }
    }
}
