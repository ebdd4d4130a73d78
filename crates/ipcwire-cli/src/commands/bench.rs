//! In-process round-trip benchmark over a real channel

use std::sync::Arc;
use std::thread;

use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use ipcwire::prelude::*;
use tracing::{debug, info};

use super::{BenchArgs, Context};
use crate::error::CliError;
use crate::output;

/// Execute the bench command
pub fn execute(args: &BenchArgs, ctx: &Context) -> Result<()> {
    if args.iterations == 0 {
        return Err(CliError::InvalidInput("--iterations must be at least 1".to_string()).into());
    }

    let transport = &ctx.config.transport;
    let name = format!("bench-{}", std::process::id());
    let metrics = Arc::new(ChannelMetrics::with_config(&ctx.config.metrics));
    let server = Metered::with_metrics(
        Channel::create_with(&name, transport)?,
        Arc::clone(&metrics),
    );

    let echo = {
        let name = name.clone();
        let transport = transport.clone();
        thread::spawn(move || -> IpcResult<u64> {
            let client = Channel::connect_with(&name, &transport)?;
            let mut echoed = 0;
            loop {
                match client.recv() {
                    Ok(message) => client.send(&message)?,
                    Err(IpcError::PeerClosed) => return Ok(echoed),
                    Err(e) => return Err(e),
                }
                echoed += 1;
            }
        })
    };

    server.wait_for_client()?;
    let payload = vec![0x5Au8; args.message_size];

    for _ in 0..args.warmup {
        server.inner().send(&payload)?;
        server.inner().recv()?;
    }
    debug!("Completed {} warmup round trips", args.warmup);
    metrics.reset();

    let progress = if ctx.json || args.exposition.is_some() {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.iterations);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    };

    for _ in 0..args.iterations {
        server.send(&payload)?;
        let reply = server.recv()?;
        if reply.len() != payload.len() {
            return Err(CliError::InvalidInput(format!(
                "echo returned {} bytes, expected {}",
                reply.len(),
                payload.len()
            ))
            .into());
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let snapshot = metrics.snapshot();
    server.inner().close();
    let Ok(echoed) = echo.join() else {
        anyhow::bail!("echo thread panicked");
    };
    let echoed = echoed.context("echo client failed")?;
    info!("Echo client handled {} messages", echoed);

    let prefix = args.exposition.as_deref().map(|p| {
        if p.is_empty() {
            ctx.config.exposition_prefix.as_str()
        } else {
            p
        }
    });
    output::print_snapshot(&snapshot, ctx.json, prefix);
    Ok(())
}
