//! One-shot channel client

use std::fs;
use std::io::{self, Read};

use anyhow::Result;
use colored::Colorize;
use ipcwire::Channel;
use serde_json::json;

use super::{Context, SendArgs};
use crate::error::CliError;

/// Execute the send command
pub fn execute(args: &SendArgs, ctx: &Context) -> Result<()> {
    let payload = read_payload(args)?;
    let channel = Channel::connect_with(&args.name, &ctx.config.transport)?;
    channel.send(&payload)?;

    if ctx.json {
        println!(
            "{}",
            json!({ "success": true, "name": channel.name(), "bytes": payload.len() })
        );
    } else {
        println!("{} {} bytes to {}", "Sent".green(), payload.len(), channel.name());
    }
    Ok(())
}

fn read_payload(args: &SendArgs) -> Result<Vec<u8>, CliError> {
    if let Some(path) = &args.file {
        return Ok(fs::read(path)?);
    }
    match args.message.as_deref() {
        Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
        Some(message) => Ok(message.as_bytes().to_vec()),
        None => Err(CliError::InvalidInput(
            "a message or --file is required".to_string(),
        )),
    }
}
