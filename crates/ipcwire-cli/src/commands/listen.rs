//! Channel server that prints what it receives

use anyhow::Result;
use colored::Colorize;
use ipcwire::{Channel, IpcError};
use serde_json::json;
use tracing::info;

use super::{Context, ListenArgs};
use crate::output;

/// Execute the listen command
pub fn execute(args: &ListenArgs, ctx: &Context) -> Result<()> {
    let channel = Channel::create_with(&args.name, &ctx.config.transport)?;
    if ctx.json {
        println!("{}", json!({ "event": "listening", "name": channel.name() }));
    } else {
        eprintln!("{} {}", "Listening on".green(), channel.name());
    }

    channel.wait_for_client()?;
    info!("Client connected to {}", channel.name());

    let mut received = 0usize;
    while args.count.is_none_or(|limit| received < limit) {
        let payload = match channel.recv() {
            Ok(payload) => payload,
            Err(IpcError::PeerClosed) => break,
            Err(e) => return Err(e.into()),
        };
        output::print_message(received, &payload, args.format, ctx.json)?;
        received += 1;
    }

    if ctx.json {
        println!("{}", json!({ "event": "done", "received": received }));
    } else {
        eprintln!("{} {} messages", "Received".green(), received);
    }
    Ok(())
}
