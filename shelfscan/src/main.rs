//! shelfscan - book cataloging from the camera
//!
//! Scan a barcode, an ISBN number or a title, look the book up in the
//! catalog, display it and append it to the spreadsheet log.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shelfscan::config::{apply_env_overrides, redacted};
use shelfscan::presenter::spawn_status_printer;
use shelfscan::workflow::session::{SessionCommand, HELP_TEXT};
use shelfscan::{Orchestrator, ScanMode, ScanOutcome};
use shelfscan_common::config::{load_config, user_config_path, write_toml_config, TomlConfig};
use shelfscan_common::{EventBus, StatusLine};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for shelfscan
#[derive(Parser, Debug)]
#[command(name = "shelfscan")]
#[command(about = "Catalog books from a camera: barcode, ISBN or title")]
#[command(version)]
struct Cli {
    /// Configuration file (overrides SHELFSCAN_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (overrides [logging].level; RUST_LOG wins over both)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive scanning loop
    Session,
    /// Scan one barcode
    Barcode,
    /// Read one ISBN number by OCR
    Isbn,
    /// Read one title by OCR
    Title,
    /// Search the catalog by title
    Search {
        /// Title text
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Print the effective configuration (API key masked)
    Config,
    /// Write the default configuration file
    InitConfig {
        /// Target path (default: ~/.config/shelfscan/config.toml)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // init-config runs before any file is loaded
    if let Command::InitConfig { path, force } = &cli.command {
        return init_config(path.clone(), *force);
    }

    let loaded = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let effective = apply_env_overrides(loaded.config.clone());
    let config = &effective.config;

    init_logging(config, cli.log_level.as_deref())?;
    info!("Starting shelfscan v{}", env!("CARGO_PKG_VERSION"));
    // Resolution ran before the subscriber existed
    loaded.log_origin();
    effective.log_resolution();

    if let Command::Config = cli.command {
        let text = toml::to_string_pretty(&redacted(config))
            .context("Failed to serialize configuration")?;
        println!("{}", text);
        return Ok(ExitCode::SUCCESS);
    }

    let status = StatusLine::new();
    let event_bus = EventBus::new(100);
    let printer = spawn_status_printer(&status, std::io::stderr());

    let orchestrator = Orchestrator::from_config(config, status, event_bus)
        .context("Failed to build scan pipeline")?;

    let code = match cli.command {
        Command::Search { title } => outcome_code(orchestrator.search_manual(&title.join(" ")).await),
        Command::Barcode => single_scan(&orchestrator, ScanMode::Barcode).await,
        Command::Isbn => single_scan(&orchestrator, ScanMode::IsbnText).await,
        Command::Title => single_scan(&orchestrator, ScanMode::TitleText).await,
        Command::Session => run_session(&orchestrator).await?,
        Command::Config | Command::InitConfig { .. } => ExitCode::SUCCESS,
    };

    // Closing the status channel lets the printer flush the final line
    drop(orchestrator);
    if let Err(e) = printer.await {
        warn!(error = %e, "Status printer task failed");
    }

    info!("shelfscan finished");
    Ok(code)
}

fn init_logging(config: &TomlConfig, cli_level: Option<&str>) -> Result<()> {
    let level = cli_level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn start_camera(orchestrator: &Orchestrator) -> Option<ExitCode> {
    match orchestrator.start().await {
        Ok(()) => None,
        Err(e) => {
            eprintln!("{}", e.status_message());
            tracing::error!(error = %e, "Cannot continue without a camera");
            Some(ExitCode::from(2))
        }
    }
}

async fn single_scan(orchestrator: &Orchestrator, mode: ScanMode) -> ExitCode {
    if let Some(code) = start_camera(orchestrator).await {
        return code;
    }
    outcome_code(orchestrator.scan(mode).await)
}

fn outcome_code(outcome: ScanOutcome) -> ExitCode {
    match outcome {
        ScanOutcome::Completed(_) => ExitCode::SUCCESS,
        ScanOutcome::Failed(_) | ScanOutcome::Ignored => ExitCode::FAILURE,
    }
}

async fn run_session(orchestrator: &Orchestrator) -> Result<ExitCode> {
    if let Some(code) = start_camera(orchestrator).await {
        return Ok(code);
    }
    eprintln!("{}", HELP_TEXT);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match SessionCommand::parse(&line) {
            Ok(SessionCommand::Scan(mode)) => {
                orchestrator.scan(mode).await;
            }
            Ok(SessionCommand::Manual(title)) => {
                orchestrator.search_manual(&title).await;
            }
            Ok(SessionCommand::Help) => eprintln!("{}", HELP_TEXT),
            Ok(SessionCommand::Quit) => break,
            Ok(SessionCommand::Empty) => {}
            Err(message) => eprintln!("{}", message),
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<ExitCode> {
    let path = match path {
        Some(path) => path,
        None => user_config_path().context("Cannot determine config directory")?,
    };

    if path.exists() && !force {
        warn!(path = %path.display(), "Config file exists");
        eprintln!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
        return Ok(ExitCode::FAILURE);
    }

    write_toml_config(&TomlConfig::default(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(ExitCode::SUCCESS)
}
