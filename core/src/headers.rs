//! Splitting a raw response and parsing its header block.

use std::collections::HashMap;

use crate::error::Error;

/// Synthetic key holding the status code from the status line.
pub const STATUS_CODE_KEY: &str = "http_status_code";
/// Synthetic key holding the reason phrase from the status line.
pub const STATUS_MESSAGE_KEY: &str = "http_status_message";

const DELIMITERS: [&[u8]; 3] = [b"\r\n\r\n", b"\n\n", b"\r\r"];

/// Split `raw` at the first blank line into `(header block, body block)`.
///
/// The earliest delimiter wins; at the same offset CRLFCRLF is preferred.
pub fn split_response(raw: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    for i in 0..raw.len() {
        let rest = &raw[i..];
        if let Some(delim) = DELIMITERS.iter().find(|d| rest.starts_with(d)) {
            return Ok((&raw[..i], &raw[i + delim.len()..]));
        }
    }
    Err(Error::MalformedResponse)
}

/// Header names mapped to trimmed values, keyed by lower-cased name.
///
/// A line without a colon is kept with no value. A repeated name keeps
/// the value of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHeaders {
    entries: HashMap<String, Option<String>>,
}

impl ParsedHeaders {
    /// Case-insensitive lookup. `None` when absent or valueless.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .and_then(|v| v.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    pub fn status_code(&self) -> Option<u16> {
        self.get(STATUS_CODE_KEY).and_then(|c| c.parse().ok())
    }

    pub fn status_message(&self) -> Option<&str> {
        self.get(STATUS_MESSAGE_KEY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

/// Parse a header block: a status line followed by `Name: value` lines.
pub fn parse_headers(block: &str) -> ParsedHeaders {
    let mut lines = split_lines(block).into_iter();
    let mut entries = HashMap::new();

    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.trim().splitn(3, ' ');
    let _protocol = parts.next();
    entries.insert(STATUS_CODE_KEY.to_string(), parts.next().map(str::to_string));
    entries.insert(STATUS_MESSAGE_KEY.to_string(), parts.next().map(str::to_string));

    for line in lines {
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name, Some(value.trim().to_string())),
            None => (line, None),
        };
        entries.insert(name.to_ascii_lowercase(), value);
    }

    ParsedHeaders { entries }
}

/// Split on CRLF, LF or CR. Like a regex split, a trailing terminator
/// yields a trailing empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(&text[start..]);
    lines
}
