mod builder;
mod collectors;
mod config;
mod platform;
mod render;
mod sampler;
mod shutdown;
mod snapshot;

use builder::{BuildOptions, SnapshotBuilder};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use collectors::system::SysinfoProvider;
use config::{Config, ConfigError};
use render::OutputFormat;
use sampler::{Mode, Sampler};
use shutdown::Shutdown;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hoststat")]
#[command(version, about = "Samples host CPU, load, memory, disk and network counters")]
struct Cli {
    /// Print an annotated configuration file and exit
    #[arg(long)]
    print_default_config: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take one sample, or keep sampling on an interval
    Collect(CollectArgs),
}

#[derive(Args, Debug)]
struct CollectArgs {
    /// YAML file with defaults for the flags below
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emit JSON records instead of a table
    #[arg(long)]
    json: bool,
    /// Time between samples, e.g. 500ms or 2s; 0 takes a single sample
    #[arg(long)]
    interval: Option<humantime::Duration>,
    /// Samples to take when streaming; 0 or negative runs until interrupted
    #[arg(long, allow_negative_numbers = true)]
    count: Option<i64>,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", Config::example_yaml());
        return;
    }
    let Some(Command::Collect(args)) = cli.command else {
        Cli::command()
            .error(ErrorKind::MissingSubcommand, "a subcommand is required")
            .exit();
    };

    let cfg = match resolve_config(&args) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(error = %err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let mut opts = BuildOptions {
        cpu_window: cfg.cpu_window(),
        ..BuildOptions::default()
    };
    if let Some(path) = &cfg.disk_path {
        opts.disk_path = path.clone();
    }
    let format = if cfg.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    let sampler = Sampler::new(
        SnapshotBuilder::new(SysinfoProvider::new(), opts),
        Mode::from_flags(cfg.interval(), cfg.count),
        format,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal_task = tokio::spawn(shutdown::forward_signals(shutdown_tx));

    let mut stdout = std::io::stdout();
    let result = sampler.run(&mut stdout, Shutdown::new(shutdown_rx)).await;
    signal_task.abort();

    match result {
        Ok(outcome) => debug!(?outcome, "sampling finished"),
        Err(err) => {
            error!(error = %err, "sampling failed");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

const MIN_INTERVAL: Duration = Duration::from_millis(1);

fn resolve_config(args: &CollectArgs) -> Result<Config, ConfigError> {
    let mut cfg = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    if args.json {
        cfg.json = true;
    }
    if let Some(flag) = &args.interval {
        let interval: Duration = **flag;
        if !interval.is_zero() && interval < MIN_INTERVAL {
            return Err(ConfigError::Validation(format!(
                "--interval must be 0 or at least 1ms, got {flag}"
            )));
        }
        cfg.interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
    }
    if let Some(count) = args.count {
        cfg.count = count;
    }

    cfg.validate()?;
    Ok(cfg)
}
