//! Extraction of JSON payloads from Server-Sent-Events streams.
//!
//! A single documentation query may come back as a multi-event SSE stream:
//! intermediate progress frames first, the final JSON-RPC result last. Only
//! `data:` lines carry payload candidates, and the last well-formed JSON
//! payload is the authoritative one.

use serde_json::Value;

/// Scan an SSE byte stream and return the last `data:` payload that parses
/// as JSON, re-encoded. Returns `{}` when nothing parses; never fails.
pub fn extract_last_json(bytes: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(bytes);
    let mut last: Option<Value> = None;

    for line in text.lines() {
        if let Some(payload) = line.trim_start().strip_prefix("data:") {
            let payload = payload.trim();
            if payload.is_empty() {
                continue;
            }
            // Non-JSON frames (keep-alives, partial chunks) are skipped silently
            if let Ok(value) = serde_json::from_str::<Value>(payload) {
                last = Some(value);
            }
        }
    }

    match last {
        Some(value) => serde_json::to_vec(&value).unwrap_or_else(|_| b"{}".to_vec()),
        None => b"{}".to_vec(),
    }
}
