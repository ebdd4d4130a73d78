//! Output formatting for CLI responses

use anyhow::Error;
use colored::Colorize;
use ipcwire::MetricsSnapshot;
use serde_json::{Value, json};

use crate::commands::MessageFormat;
use crate::error;

/// Print a JSON value, pretty-printed
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    print_json(&json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error::type_name(error),
            "exit_code": error::exit_code(error),
        }
    }));
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Render a payload in the requested format.
pub fn render_payload(payload: &[u8], format: MessageFormat) -> Result<String, ipcwire::IpcError> {
    match format {
        MessageFormat::Text => Ok(String::from_utf8_lossy(payload).into_owned()),
        MessageFormat::Json => {
            let value: Value = ipcwire::transport::decode_json(payload)?;
            Ok(value.to_string())
        }
        MessageFormat::Hex => Ok(to_hex(payload)),
    }
}

/// Lowercase hex with no separators
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Print one received message
pub fn print_message(
    index: usize,
    payload: &[u8],
    format: MessageFormat,
    json: bool,
) -> anyhow::Result<()> {
    let rendered = render_payload(payload, format)?;
    if json {
        let value = match format {
            MessageFormat::Json => serde_json::from_str::<Value>(&rendered)?,
            MessageFormat::Text | MessageFormat::Hex => Value::String(rendered),
        };
        println!(
            "{}",
            json!({ "index": index, "size": payload.len(), "payload": value })
        );
    } else {
        println!("{} {}", format!("[{index}]").dimmed(), rendered);
    }
    Ok(())
}

/// Print a metrics snapshot as a table, pretty JSON or exposition lines
pub fn print_snapshot(snapshot: &MetricsSnapshot, json: bool, exposition: Option<&str>) {
    if let Some(prefix) = exposition {
        print!("{}", snapshot.to_exposition(prefix));
        return;
    }
    if json {
        println!("{}", snapshot.to_json_pretty());
        return;
    }

    println!("{}", "Round-trip metrics".bold());
    for (name, value) in snapshot.fields() {
        println!("  {:<22} {}", name, value.to_string().cyan());
    }
    println!(
        "  {:<22} {}",
        "error_rate_percent",
        format!("{:.2}", snapshot.error_rate_percent()).cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_formats() -> Result<(), ipcwire::IpcError> {
        assert_eq!(render_payload(b"hi", MessageFormat::Text)?, "hi");
        assert_eq!(render_payload(b"\x00\xff", MessageFormat::Hex)?, "00ff");
        assert_eq!(
            render_payload(br#"{ "a" : 1 }"#, MessageFormat::Json)?,
            r#"{"a":1}"#
        );
        assert!(render_payload(b"{oops", MessageFormat::Json).is_err());
        Ok(())
    }
}
