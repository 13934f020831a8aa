//! Reconstruction of captured requests as cURL commands.
//!
//! Only the request side of an entry is used; response fields are ignored.
//! Output is deterministic for a given entry so it can be diffed and
//! replayed: headers are emitted in sorted order.

use crate::types::NetworkLogEntry;

/// Renders `entry`'s request as a shell-safe cURL command.
///
/// Headers appear sorted by name, one `-H` flag each, and the body (when
/// present) as a single `-d` argument. Single quotes inside values are
/// escaped for POSIX shells.
#[must_use]
pub fn generate(entry: &NetworkLogEntry) -> String {
    let mut parts = Vec::new();
    parts.push(format!("curl -X {}", entry.method));

    let mut headers: Vec<(&String, &String)> = entry.request_headers.iter().collect();
    headers.sort_by_key(|(name, _)| name.as_str());
    for (name, value) in headers {
        parts.push(format!("-H '{}'", escape_single_quotes(&format!("{name}: {value}"))));
    }

    if let Some(ref body) = entry.request_body {
        parts.push(format!("-d '{}'", escape_single_quotes(body)));
    }

    parts.push(format!("'{}'", escape_single_quotes(&entry.url)));
    parts.join(" \\\n  ")
}

fn escape_single_quotes(value: &str) -> String {
    // Close the quoted span, emit an escaped quote, reopen it.
    value.replace('\'', "'\\''")
}
