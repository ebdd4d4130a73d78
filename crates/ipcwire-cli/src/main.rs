//! ipcwire - IPC toolkit CLI
//!
//! Exercise channels and shared-memory segments from the shell and measure
//! round-trip performance.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod config;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{BenchArgs, Context, ListenArgs, SendArgs, ShmCommands};
use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "ipcwire")]
#[command(about = "ipcwire - Same-host IPC channels, shared memory and metrics")]
#[command(version)]
#[command(long_about = "
ipcwire exercises the ipcwire transports from the command line: run a channel
server or client, publish and read shared-memory segments, and benchmark
round trips with a metrics report.

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// YAML configuration file
    #[arg(long, global = true, env = "IPCWIRE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a channel server and print received messages
    Listen(ListenArgs),

    /// Connect to a channel and send one message
    Send(SendArgs),

    /// Shared-memory segment commands
    #[command(subcommand)]
    Shm(ShmCommands),

    /// Benchmark round trips over a real channel
    Bench(BenchArgs),

    /// Show the platform backend, name resolution and configuration
    Info,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    if let Commands::Completion { shell } = &cli.command {
        completion::generate_completion(*shell);
        return Ok(());
    }

    let ctx = Context {
        json: cli.json,
        config: CliConfig::load(cli.config.as_deref())?,
    };

    match &cli.command {
        Commands::Listen(args) => commands::listen::execute(args, &ctx),
        Commands::Send(args) => commands::send::execute(args, &ctx),
        Commands::Shm(cmd) => commands::shm::execute(cmd, &ctx),
        Commands::Bench(args) => commands::bench::execute(args, &ctx),
        Commands::Info => commands::info::execute(&ctx),
        Commands::Completion { .. } => Ok(()),
    }
}
