use clap::Parser;
use colored::*;
use setkit_cli::config::{Config, OutputFormat};
use setkit_settings::SettingsRequest;
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "setkit")]
#[command(about = "setkit - read, list, write and delete system, secure and global settings")]
#[command(version)]
struct Cli {
    /// Operation to run: list, get, put or delete
    #[arg(short, long)]
    method: Option<String>,

    /// Settings namespace: system, secure or global
    #[arg(short, long)]
    namespace: Option<String>,

    /// Setting name (get, put, delete)
    #[arg(short, long)]
    key: Option<String>,

    /// Setting value (put)
    #[arg(short = 'v', long)]
    value: Option<String>,

    /// SQLite database to use instead of SETKIT_DB_PATH
    #[arg(long, conflicts_with = "memory")]
    db: Option<PathBuf>,

    /// Use a throwaway in-memory store
    #[arg(long)]
    memory: bool,

    /// Permission held by the caller; repeat to grant several (replaces SETKIT_GRANTED_PERMISSIONS)
    #[arg(long = "grant", value_name = "PERMISSION")]
    grants: Vec<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays the result channel
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let grants = (!cli.grants.is_empty()).then(|| cli.grants.join(","));
    let mut config = Config::from_env_with_overrides(grants.as_deref(), cli.format)?;

    if cli.memory {
        config = config.with_database(setkit_cli::config::MEMORY_DATABASE);
    } else if let Some(db) = &cli.db {
        config = config.with_database(&db.to_string_lossy());
    }

    let request = SettingsRequest {
        method: cli.method,
        namespace: cli.namespace,
        key: cli.key,
        value: cli.value,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    setkit_cli::execute(&config, &request, &mut out).await
}
