//! Shared-memory segment commands

use std::io::{self, Read};

use anyhow::Result;
use colored::Colorize;
use ipcwire::SharedSegment;
use serde_json::json;
use tracing::info;

use super::{Context, ShmCommands};
use crate::output;

/// Execute a shm subcommand
pub fn execute(cmd: &ShmCommands, ctx: &Context) -> Result<()> {
    match cmd {
        ShmCommands::Create { name, size } => create(name, *size, ctx),
        ShmCommands::Write { name, message } => write(name, message, ctx),
        ShmCommands::Read {
            name,
            offset,
            len,
            format,
        } => read(name, *offset, *len, *format, ctx),
    }
}

fn create(name: &str, size: usize, ctx: &Context) -> Result<()> {
    let segment = SharedSegment::create(name, size)?;
    if ctx.json {
        println!(
            "{}",
            json!({ "event": "created", "name": name, "os_id": segment.os_id(), "size": size })
        );
    } else {
        println!(
            "{} segment {} ({} bytes, {})",
            "Created".green(),
            name.bold(),
            size,
            segment.os_id().dimmed()
        );
        eprintln!("Holding segment until stdin closes");
    }

    // Block until the controlling process closes our stdin.
    let mut sink = Vec::new();
    io::stdin().read_to_end(&mut sink)?;
    info!("Releasing segment {}", name);
    drop(segment);
    Ok(())
}

fn write(name: &str, message: &str, ctx: &Context) -> Result<()> {
    let mut segment = SharedSegment::open(name)?;
    segment.write_message(message.as_bytes())?;
    if ctx.json {
        println!(
            "{}",
            json!({ "success": true, "name": name, "bytes": message.len() })
        );
    } else {
        println!("{} {} bytes to {}", "Published".green(), message.len(), name);
    }
    Ok(())
}

fn read(
    name: &str,
    offset: Option<usize>,
    len: Option<usize>,
    format: super::MessageFormat,
    ctx: &Context,
) -> Result<()> {
    let segment = SharedSegment::open(name)?;
    let payload = if offset.is_some() || len.is_some() {
        let offset = offset.unwrap_or(0);
        let len = len.unwrap_or_else(|| segment.size().saturating_sub(offset));
        Some(segment.read(offset, len)?)
    } else {
        segment.read_message()?
    };

    match payload {
        Some(payload) => output::print_message(0, &payload, format, ctx.json)?,
        None if ctx.json => println!("{}", json!({ "payload": null })),
        None => println!("{}", "No message published".yellow()),
    }
    Ok(())
}
