//! channel-catalog: build the channel catalog from a configuration file and
//! inspect it.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{error, info};

use channel_catalog::{Catalog, ChannelSnapshot};

mod backends;
mod config;
mod logging;
mod monitor;
mod report;

use config::ConfigFile;
use monitor::LogMonitor;

/// Default configuration file, used when present and no --config is given.
const DEFAULT_CONFIG: &str = "channel-catalog.toml";

/// channel-catalog - Channel, group and service catalog loader
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'f', long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory where log files are stored
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Number of days to keep log files
    #[arg(long)]
    log_retention_days: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the catalog and report what was registered
    Load,
    /// List channels
    Channels {
        /// Print a JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List channel groups and their members
    Groups {
        /// Print a JSON snapshot instead of a list
        #[arg(long)]
        json: bool,
    },
    /// Show one channel with its services
    Show {
        /// Channel name (case-insensitive)
        name: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config file: explicit path > auto-detect > empty
    let config_path = args.config.clone().or_else(|| {
        let default_path = PathBuf::from(DEFAULT_CONFIG);
        default_path.exists().then_some(default_path)
    });
    let file_config = match &config_path {
        Some(path) => match config::load_config(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{} ({})", e, path.display());
                return Err(e.into());
            }
        },
        None => ConfigFile::default(),
    };

    // Command line takes precedence over the config file
    let log_dir = args
        .log_dir
        .clone()
        .or_else(|| file_config.logging.log_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let retention_days = args
        .log_retention_days
        .or(file_config.logging.retention_days)
        .unwrap_or(7);
    logging::init_logging(
        &log_dir,
        retention_days,
        args.verbose,
        file_config.logging.level.as_deref(),
    )?;

    match &config_path {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file, starting with an empty catalog"),
    }

    let bootstrap = backends::from_config(&file_config.backends);
    let mut catalog = Catalog::new();
    catalog.set_monitor(LogMonitor);
    let load_report = bootstrap.load(&mut catalog, &file_config.to_source());

    let shared = catalog.into_shared();
    let catalog = shared.lock();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command {
        Command::Load => report::write_summary(&mut out, &load_report, &catalog)?,
        Command::Channels { json: true } => report::write_channels_json(&mut out, &catalog)?,
        Command::Groups { json: true } => report::write_groups_json(&mut out, &catalog)?,
        Command::Channels { json: false } => report::write_channels(&mut out, &catalog)?,
        Command::Groups { json: false } => report::write_groups(&mut out, &catalog)?,
        Command::Show { name, json } => {
            let Some(id) = catalog.find_channel(&name) else {
                error!("No such channel: {}", name);
                return Err(format!("No such channel: {}", name).into());
            };
            if json {
                serde_json::to_writer_pretty(&mut out, &ChannelSnapshot::capture(&catalog, id))?;
                writeln!(out)?;
            } else {
                report::write_channel(&mut out, &catalog, id)?;
            }
        }
    }

    Ok(())
}
