// ============================================================
// CSV RECORD READER
// ============================================================
// Pull-based stream of nested raw records from a delimited source

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::Path;

use serde_json::Value;

use crate::domain::error::{AppError, Result};
use crate::domain::record::{set_nested, RawRecord};

use super::line::split_line;

/// Lazy, single-pass reader turning CSV lines into [`RawRecord`]s.
///
/// The first non-blank line is the header row; dotted header names denote
/// nested destination paths. Every later non-blank line yields one record
/// with only its defined, non-empty cells assigned. Blank lines are
/// skipped wherever they appear. Short rows and extra columns are mapped
/// best-effort, never an error. The underlying handle is released on drop
/// regardless of how iteration ends.
#[derive(Debug)]
pub struct RecordReader<R: BufRead> {
    lines: Lines<R>,
    headers: Option<Vec<String>>,
}

impl RecordReader<BufReader<File>> {
    /// Open a CSV file for record streaming.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => {
                AppError::NotFound(format!("CSV file not found at path: {}", path.display()))
            }
            _ => AppError::IoError(format!("Failed to open {}: {}", path.display(), err)),
        })?;

        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            headers: None,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            if line.trim().is_empty() {
                continue;
            }

            let fields = split_line(&line);
            if self.headers.is_none() {
                self.headers = Some(fields);
                continue;
            }

            let mut record = RawRecord::new();
            if let Some(headers) = &self.headers {
                for (idx, header) in headers.iter().enumerate() {
                    match fields.get(idx) {
                        Some(value) if !value.is_empty() => {
                            set_nested(&mut record, header, Value::String(value.clone()));
                        }
                        // Short row or empty cell: the key is never set
                        _ => {}
                    }
                }
            }
            return Some(Ok(record));
        }
    }
}
