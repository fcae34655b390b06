//! Shared HTTP client, SSE parsing, and status mapping.

use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{AnswerError, Result};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Build a client with the given request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()?)
}

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| build_client(DEFAULT_TIMEOUT).unwrap_or_default())
}

/// Parse an SSE "data:" line.
pub fn parse_sse_data(line: &str) -> Option<&str> {
    let data = line
        .strip_prefix("data: ")
        .or_else(|| line.strip_prefix("data:"))?;
    if data.is_empty() {
        return None;
    }
    Some(data)
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> AnswerError {
    match status {
        401 | 403 => AnswerError::Configuration(format!(
            "request rejected (status {status}), check credentials: {body}"
        )),
        _ => AnswerError::api(status, body),
    }
}

/// Splits a byte stream into newline-terminated lines.
///
/// Bytes are buffered until a full line is available so multi-byte
/// characters split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Append bytes and drain every complete line.
    ///
    /// Only the new bytes are scanned, and the consumed prefix is removed
    /// in a single drain.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        // Bytes already pending hold no newline.
        let scan_from = self.pending.len();
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        let mut start = 0;
        for (offset, byte) in self.pending[scan_from..].iter().enumerate() {
            if *byte == b'\n' {
                let end = scan_from + offset;
                lines.push(String::from_utf8_lossy(&self.pending[start..end]).trim().to_string());
                start = end + 1;
            }
        }
        self.pending.drain(..start);
        lines
    }

    /// Whatever is left once the stream ended.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        let line = String::from_utf8_lossy(&rest).trim().to_string();
        (!line.is_empty()).then_some(line)
    }
}
