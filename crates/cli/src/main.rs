//! Command-line interface for watching card UIDs

use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use cardwatch_transport_pcsc::{CardEvent, PcscConfig, PcscDeviceManager};

mod reader;

#[derive(Parser)]
#[command(version, about = "Watch a PC/SC reader and print presented card UIDs")]
struct Cli {
    /// Trace level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    List,

    /// Wait for one card and print its UID
    Read {
        /// Only accept cards from this reader (any reader if not specified)
        #[arg(short, long)]
        reader: Option<String>,

        /// Give up after this many seconds
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Continuously watch for cards, printing one line per presentation
    Watch {
        /// Only report cards from this reader (all readers if not specified)
        #[arg(short, long)]
        reader: Option<String>,

        /// Delay between poll rounds, in milliseconds
        #[arg(short, long, default_value_t = 500)]
        interval: u64,

        /// Give up when no card arrives within this many seconds
        #[arg(short, long)]
        timeout: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    // Create a PC/SC device manager
    let manager = PcscDeviceManager::new()?;

    match &cli.command {
        Commands::List => reader::list_readers(&manager)?,
        Commands::Read { reader, timeout } => {
            read_command(&manager, reader.as_deref(), *timeout)?
        }
        Commands::Watch {
            reader,
            interval,
            timeout,
        } => watch_command(&manager, reader.as_deref(), *interval, *timeout)?,
    }

    Ok(())
}

/// Wait for a single card and print its UID
fn read_command(
    manager: &PcscDeviceManager,
    reader: Option<&str>,
    timeout: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = PcscConfig::default().with_wait_timeout(timeout.map(Duration::from_secs));
    let mut monitor = manager.monitor(config)?;
    if let Some(name) = reader {
        // Resolve the name up front so a typo fails fast
        monitor = monitor.with_reader(manager.find_reader(Some(name))?.name());
    }

    // A wait timeout propagates out of main and ends the process
    let (from, uid) = monitor.wait_for_card()?;
    info!(reader = %from, "card presented");
    println!("{}", uid.to_string().green().bold());
    Ok(())
}

/// Watch for cards until interrupted (or the wait times out)
fn watch_command(
    manager: &PcscDeviceManager,
    reader: Option<&str>,
    interval: u64,
    timeout: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = PcscConfig::default()
        .with_poll_interval(Duration::from_millis(interval))
        .with_wait_timeout(timeout.map(Duration::from_secs));

    let mut monitor = manager.monitor(config)?;
    if let Some(name) = reader {
        monitor = monitor.with_reader(manager.find_reader(Some(name))?.name());
    }
    let handle = monitor.spawn();

    println!("Watching for cards. Press Ctrl+C to exit.");

    // The monitor thread does the blocking waits; we drain its events
    for event in handle.events() {
        match event {
            CardEvent::Presented { reader: from, uid } => {
                println!("{}  {}", uid.to_string().green().bold(), from.dimmed());
            }
            CardEvent::Removed { reader: from } => {
                info!(reader = %from, "card removed");
            }
        }
    }

    // The channel closed, so the monitor thread exited; propagate its
    // verdict (a wait timeout terminates the process here).
    handle.join()?;
    Ok(())
}

/// Default filter directive applied when `RUST_LOG` is not set
const fn log_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn setup_logging(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .init();
}
