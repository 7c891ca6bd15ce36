//! JSON Lines message log reader
//!
//! Reads `(channel, message, timestamp)` triples, one JSON object per line:
//!
//! ```text
//! {"channel": "/nav/nav_sts", "timestamp_ns": 1700000000000000000,
//!  "message": {"status": 3, "global_position": {"latitude": 45.1, "longitude": 13.6}, "altitude": 0.0}}
//! ```
//!
//! Blank lines are skipped. A line that does not parse is an error carrying its line
//! number; a line that parses but has a missing status or null coordinates is a
//! malformed record and is left for the extractor to reject.
//!
//! Producers that dump non-finite floats as bare `NaN`, `Infinity` or `-Infinity`
//! tokens (Python's `json` module does) are accepted: those tokens are read as `null`.

use crate::types::{NavMessage, Result, TrajectoryError};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// Message log reader
pub struct MessageReader;

impl MessageReader {
    /// Open a JSON Lines file and return an iterator over its messages
    pub fn open(path: &Path) -> Result<MessageIterator<BufReader<File>>> {
        log::info!("Opening message log: {:?}", path);

        if !path.exists() {
            return Err(TrajectoryError::LogOpenError(format!(
                "Message log not found: {:?}",
                path
            )));
        }

        let file = File::open(path).map_err(|e| {
            TrajectoryError::LogOpenError(format!("Failed to open message log {:?}: {}", path, e))
        })?;

        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Read messages from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> MessageIterator<R> {
        MessageIterator {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

/// Iterator over messages from a JSON Lines source
pub struct MessageIterator<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: BufRead> Iterator for MessageIterator<R> {
    type Item = Result<NavMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            let line = replace_non_finite(&line);
            return Some(serde_json::from_str(&line).map_err(|source| {
                TrajectoryError::InvalidLine {
                    line: self.line_number,
                    source,
                }
            }));
        }
    }
}

const NON_FINITE_TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Replace bare non-finite float tokens outside of strings with `null`
fn replace_non_finite(line: &str) -> Cow<'_, str> {
    if !line.contains("NaN") && !line.contains("Infinity") {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE_TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const LOG: &str = r#"{"channel":"/nav","timestamp_ns":1,"message":{"status":3,"global_position":{"latitude":45.0,"longitude":13.0},"altitude":0.5}}

{"channel":"/nav","timestamp_ns":2,"message":{"global_position":{"latitude":45.1,"longitude":13.1},"altitude":0.5}}
"#;

    #[test]
    fn test_reads_messages_and_skips_blank_lines() {
        let messages: Vec<NavMessage> = MessageReader::from_reader(Cursor::new(LOG))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].channel, "/nav");
        assert_eq!(messages[0].message.status, Some(3));
        assert_eq!(messages[0].message.global_position.longitude, 13.0);
        assert_eq!(messages[1].message.status, None);
    }

    #[test]
    fn test_invalid_line_reports_line_number() {
        let log = format!("{}\nnot json\n", LOG.lines().next().unwrap());
        let results: Vec<_> = MessageReader::from_reader(Cursor::new(log)).collect();

        assert!(results[0].is_ok());
        match &results[1] {
            Err(TrajectoryError::InvalidLine { line, .. }) => assert_eq!(*line, 2),
            other => panic!("expected InvalidLine, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_tokens_read_as_null() {
        let log = r#"{"channel":"NaN/Infinity","message":{"status":1,"global_position":{"latitude":NaN,"longitude":-Infinity},"altitude":Infinity}}"#;
        let msg = MessageReader::from_reader(Cursor::new(log))
            .next()
            .unwrap()
            .unwrap();

        assert_eq!(msg.channel, "NaN/Infinity");
        assert!(msg.message.global_position.latitude.is_nan());
        assert!(msg.message.global_position.longitude.is_nan());
        assert!(msg.message.altitude.is_nan());
        assert!(!msg.message.is_valid());
    }

    #[test]
    fn test_replace_non_finite_leaves_strings_alone() {
        assert!(matches!(replace_non_finite(r#"{"a":1.0}"#), Cow::Borrowed(_)));
        assert_eq!(
            replace_non_finite(r#"{"s":"say \"NaN\"","v":[NaN,1]}"#),
            r#"{"s":"say \"NaN\"","v":[null,1]}"#
        );
    }

    #[test]
    fn test_open_missing_file() {
        let result = MessageReader::open(Path::new("nonexistent.jsonl"));
        assert!(result.is_err());
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LOG.as_bytes()).unwrap();

        let count = MessageReader::open(file.path()).unwrap().count();
        assert_eq!(count, 2);
    }
}
