//! Export of captured entries to text formats.
//!
//! Rendering is a pure transformation over a storage query: entries arrive
//! newest first from the store and are emitted in that order, never
//! filtered or reordered here. Storage failures propagate; formatting
//! itself cannot fail on well-formed entries.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use crate::error::Result;
use crate::filter::{LogFilter, NetworkLogFilter};
use crate::store::Store;
use crate::types::{LogEntry, NetworkLogEntry};

/// Output format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Human-readable text with a summary header.
    Text,
    /// A single JSON document with export metadata.
    Json,
    /// RFC-4180-style CSV with a header row.
    Csv,
}

/// Exports application log entries matching `filter`.
///
/// # Errors
///
/// Returns an error if the storage query fails.
pub fn export_logs<S: Store<LogEntry>>(
    store: &S,
    filter: &LogFilter,
    format: ExportFormat,
) -> Result<String> {
    let entries = store.query(filter, None)?;
    Ok(match format {
        ExportFormat::Text => logs_to_text(&entries),
        ExportFormat::Json => to_json(&entries),
        ExportFormat::Csv => logs_to_csv(&entries),
    })
}

/// Exports network log entries matching `filter`.
///
/// # Errors
///
/// Returns an error if the storage query fails.
pub fn export_network_logs<S: Store<NetworkLogEntry>>(
    store: &S,
    filter: &NetworkLogFilter,
    format: ExportFormat,
) -> Result<String> {
    let entries = store.query(filter, None)?;
    Ok(match format {
        ExportFormat::Text => network_logs_to_text(&entries),
        ExportFormat::Json => to_json(&entries),
        ExportFormat::Csv => network_logs_to_csv(&entries),
    })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn logs_to_text(entries: &[LogEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Log Export ===");
    let _ = writeln!(out, "Exported: {}", format_timestamp(Utc::now()));
    let _ = writeln!(out, "Total entries: {}", entries.len());
    let _ = writeln!(out);

    for entry in entries {
        let _ = writeln!(
            out,
            "{} [{}] {}",
            format_timestamp(entry.timestamp),
            entry.level.as_str(),
            entry.tag
        );
        let _ = writeln!(out, "  {}", entry.message);
        if let Some(ref throwable) = entry.throwable {
            let _ = writeln!(out, "  Error: {throwable}");
        }
        if !entry.metadata.is_empty() {
            let mut pairs: Vec<String> = entry
                .metadata
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            pairs.sort();
            let _ = writeln!(out, "  Metadata: {}", pairs.join(", "));
        }
        let _ = writeln!(out);
    }
    out
}

fn network_logs_to_text(entries: &[NetworkLogEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Network Log Export ===");
    let _ = writeln!(out, "Exported: {}", format_timestamp(Utc::now()));
    let _ = writeln!(out, "Total requests: {}", entries.len());
    let _ = writeln!(out);

    for entry in entries {
        let _ = writeln!(
            out,
            "{} {} {}",
            format_timestamp(entry.timestamp),
            entry.method,
            entry.url
        );
        match entry.response_code {
            Some(code) => {
                let _ = writeln!(out, "  Status: {code}");
            }
            None => {
                let _ = writeln!(out, "  Status: ERROR");
            }
        }
        let _ = writeln!(out, "  Duration: {}ms", entry.duration_ms);
        if let Some(ref body) = entry.request_body {
            let _ = writeln!(out, "  Request Body: {body}");
        }
        if let Some(ref body) = entry.response_body {
            let _ = writeln!(out, "  Response Body: {body}");
        }
        if let Some(ref error) = entry.error {
            let _ = writeln!(out, "  Error: {error}");
        }
        let _ = writeln!(out);
    }
    out
}

fn to_json<T: serde::Serialize>(entries: &[T]) -> String {
    let doc = json!({
        "exported_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "total": entries.len(),
        "entries": entries,
    });
    serde_json::to_string_pretty(&doc).unwrap_or_else(|_| "{}".to_string())
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn logs_to_csv(entries: &[LogEntry]) -> String {
    let mut out = String::from("timestamp,level,tag,message,throwable\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            format_timestamp(entry.timestamp),
            entry.level.as_str(),
            escape_csv(&entry.tag),
            escape_csv(&entry.message),
            escape_csv(entry.throwable.as_deref().unwrap_or(""))
        );
    }
    out
}

fn network_logs_to_csv(entries: &[NetworkLogEntry]) -> String {
    let mut out = String::from("timestamp,method,url,status,duration_ms,error\n");
    for entry in entries {
        let status = entry
            .response_code
            .map(|c| c.to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            format_timestamp(entry.timestamp),
            escape_csv(&entry.method),
            escape_csv(&entry.url),
            status,
            entry.duration_ms,
            escape_csv(entry.error.as_deref().unwrap_or(""))
        );
    }
    out
}
