//! Command implementations for the ipcwire CLI

pub mod bench;
pub mod info;
pub mod listen;
pub mod send;
pub mod shm;

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::CliConfig;

/// State shared by every command
#[derive(Debug)]
pub struct Context {
    pub json: bool,
    pub config: CliConfig,
}

/// How received payloads are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    /// UTF-8 text, invalid sequences replaced
    Text,
    /// Parsed and re-serialized JSON
    Json,
    /// Lowercase hex
    Hex,
}

#[derive(Debug, Args)]
pub struct ListenArgs {
    /// Channel name
    #[arg(short, long)]
    pub name: String,
    /// Stop after this many messages
    #[arg(short, long)]
    pub count: Option<usize>,
    /// Payload rendering
    #[arg(short, long, value_enum, default_value_t = MessageFormat::Text)]
    pub format: MessageFormat,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Channel name
    #[arg(short, long)]
    pub name: String,
    /// Send the contents of this file
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,
    /// Message text, or `-` to read stdin
    #[arg(required_unless_present = "file")]
    pub message: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ShmCommands {
    /// Create a segment and hold it until stdin closes
    Create {
        /// Segment name
        #[arg(short, long)]
        name: String,
        /// Size in bytes
        #[arg(short, long)]
        size: usize,
    },

    /// Publish a message using the length-prefix convention
    Write {
        /// Segment name
        #[arg(short, long)]
        name: String,
        /// Message text
        message: String,
    },

    /// Read the published message, or a raw byte range
    Read {
        /// Segment name
        #[arg(short, long)]
        name: String,
        /// Start of a raw range
        #[arg(long)]
        offset: Option<usize>,
        /// Length of a raw range (defaults to the rest of the segment)
        #[arg(long)]
        len: Option<usize>,
        /// Payload rendering
        #[arg(short, long, value_enum, default_value_t = MessageFormat::Text)]
        format: MessageFormat,
    },
}

#[derive(Debug, Args)]
pub struct BenchArgs {
    /// Measured round trips
    #[arg(short, long, default_value_t = 1000)]
    pub iterations: u64,
    /// Payload size in bytes
    #[arg(short, long, default_value_t = 256)]
    pub message_size: usize,
    /// Unmeasured round trips before measuring
    #[arg(short, long, default_value_t = 10)]
    pub warmup: u64,
    /// Print exposition lines with this prefix instead of a table
    #[arg(long, value_name = "PREFIX", num_args = 0..=1, default_missing_value = "")]
    pub exposition: Option<String>,
}
