// Moving Average Crossover Alert - CLI
// Meant to be invoked once per minute by an external scheduler (cron, CI)

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ma_cross_alert::{
    Config, FileStateStore, GitHubIssueNotifier, LogNotifier, MonitorError, MonitorSettings,
    RunOutcome, SignalMonitor, StateStore, YahooChartClient, NO_STATE,
};

#[derive(Parser)]
#[command(name = "ma-cross-alert")]
#[command(version)]
#[command(about = "Moving average crossover alerts for intraday stock prices", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (optional; defaults apply when missing)
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check for a new crossover and notify (default)
    Run {
        /// Run even when the market is closed
        #[arg(long)]
        ignore_schedule: bool,

        /// Log the alert instead of sending it; the state file is not written
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Show trading-window status and the stored signal state
    Status,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, directives))
        .init();

    let command = cli.command.unwrap_or(Commands::Run {
        ignore_schedule: false,
        dry_run: false,
    });

    match command {
        Commands::Init { force } => init_config(&cli.config, force)?,
        Commands::Status => {
            let config = load_config_or_exit(&cli.config);
            show_status(&config)?;
        }
        Commands::Run { ignore_schedule, dry_run } => {
            let config = load_config_or_exit(&cli.config);
            if let Err(e) = run(&config, ignore_schedule, dry_run).await {
                error!("❌ {} error", e.category());
                for line in e.user_message().lines() {
                    error!("{}", line);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// `RUST_LOG` wins when it parses; otherwise info, or debug with `--verbose`
fn log_filter(verbose: bool, directives: Option<String>) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

/// Load config or exit with helpful error message
fn load_config_or_exit(path: &str) -> Config {
    match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuration Error");
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn run(config: &Config, ignore_schedule: bool, dry_run: bool) -> Result<(), MonitorError> {
    let settings = MonitorSettings::from_config(config).with_schedule_ignored(ignore_schedule);
    let gate = config.trading_gate()?;
    let fetcher = YahooChartClient::from_config(&config.data)?;
    let state_file = &config.monitor.state_file;

    let outcome = if dry_run {
        let store = FileStateStore::read_only(state_file);
        SignalMonitor::new(settings, gate, fetcher, LogNotifier, store).run().await?
    } else {
        let notifier = GitHubIssueNotifier::from_config(&config.notifier)?;
        let store = FileStateStore::new(state_file);
        SignalMonitor::new(settings, gate, fetcher, notifier, store).run().await?
    };

    if let RunOutcome::Notified { delivery, .. } = &outcome {
        if !delivery.succeeded() {
            warn!("⚠️  State was recorded although delivery did not succeed: {:?}", delivery);
        }
    }

    Ok(())
}

fn show_status(config: &Config) -> Result<(), MonitorError> {
    let gate = config.trading_gate()?;
    let now = Utc::now();

    info!("🕒 Exchange time: {}", gate.local_time(now).format("%Y-%m-%d %H:%M:%S %:z"));
    info!("🚦 Gate: {:?}", gate.check(now));

    match config.symbol() {
        Ok(symbol) => info!("📈 Symbol: {}", symbol),
        Err(e) => warn!("⚠️  {}", e),
    }

    let store = FileStateStore::new(&config.monitor.state_file);
    let state = store.load()?;
    info!(
        "💾 State ({}): {}",
        store.path().display(),
        state.as_deref().unwrap_or(NO_STATE)
    );

    Ok(())
}

fn init_config(path: &str, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if std::path::Path::new(path).exists() && !force {
        warn!("⚠️  {} already exists, skipping (use --force to overwrite)", path);
        return Ok(());
    }

    std::fs::write(path, include_str!("../config.toml.example"))?;
    info!("📝 Created {}", path);
    Ok(())
}
