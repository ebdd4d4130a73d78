//! Platform and configuration report

use anyhow::Result;
use colored::Colorize;
use ipcwire::shm::segment_os_id;
use ipcwire::transport::{TransportKind, resolve};
use serde_json::json;

use super::Context;
use crate::output;

const EXAMPLE_NAME: &str = "example";

/// Execute the info command
pub fn execute(ctx: &Context) -> Result<()> {
    let kind = TransportKind::platform_default();
    let channel_name = resolve(EXAMPLE_NAME, &ctx.config.transport)?;
    let segment_name = segment_os_id(EXAMPLE_NAME)?;

    if ctx.json {
        output::print_json(&json!({
            "version": env!("CARGO_PKG_VERSION"),
            "platform": std::env::consts::OS,
            "transport": kind,
            "transport_description": kind.description(),
            "example_channel": channel_name,
            "example_segment": segment_name,
            "config": ctx.config,
        }));
        return Ok(());
    }

    println!("{} {}", "ipcwire".bold(), env!("CARGO_PKG_VERSION"));
    println!("  Platform:  {}", std::env::consts::OS);
    println!("  Transport: {}", kind.description());
    println!("  Channel {EXAMPLE_NAME:?} resolves to {}", channel_name.cyan());
    println!("  Segment {EXAMPLE_NAME:?} resolves to {}", segment_name.cyan());
    println!();
    println!("{}", "Effective configuration".bold());
    print!("{}", serde_yaml::to_string(&ctx.config)?);
    Ok(())
}
