//! Delimited text loader (TSV by default) producing labeled [`Record`]s.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::Record;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found: {path}")]
    FileNotFound { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{origin}:{line}: expected {expected} columns, found {found}")]
    ColumnCount {
        origin: String,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("{origin}:{line}: invalid boolean label {value:?}")]
    InvalidLabel {
        origin: String,
        line: usize,
        value: String,
    },
    #[error("{origin}: column {column} is out of range for {columns}-column rows")]
    MissingColumn {
        origin: String,
        column: usize,
        columns: usize,
    },
}

impl DatasetError {
    /// True for malformed content, false for filesystem failures.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::ColumnCount { .. } | Self::InvalidLabel { .. } | Self::MissingColumn { .. }
        )
    }
}

/// Where and how to read the labeled dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Dataset file path.
    pub path: PathBuf,
    /// Skip the first non-blank line.
    pub has_header: bool,
    /// Column delimiter.
    pub separator: char,
    /// Zero-based index of the free-text column.
    pub text_column: usize,
    /// Zero-based index of the boolean label column.
    pub label_column: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/sentiment.tsv"),
            has_header: true,
            separator: '\t',
            text_column: 0,
            label_column: 1,
        }
    }
}

/// Load every record from `options.path`, preserving file order.
pub fn load_records(options: &LoaderOptions) -> Result<Vec<Record>, DatasetError> {
    let path = options.path.as_path();
    let file = File::open(path).map_err(|source| open_error(path, source))?;
    let origin = path.display().to_string();
    let records = parse_records(BufReader::new(file), options, &origin)?;
    info!(
        "Loaded {} records from {} ({} positive)",
        records.len(),
        origin,
        records.iter().filter(|r| r.label() == Some(true)).count()
    );
    Ok(records)
}

/// Parse delimited rows from any reader. `origin` names the source in errors.
pub fn parse_records<R: BufRead>(
    mut reader: R,
    options: &LoaderOptions,
    origin: &str,
) -> Result<Vec<Record>, DatasetError> {
    let mut expected: Option<usize> = None;
    let mut header_pending = options.has_header;
    let mut records = Vec::new();

    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| DatasetError::Read {
                path: PathBuf::from(origin),
                source,
            })?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let decoded = String::from_utf8_lossy(&buf);
        if matches!(decoded, Cow::Owned(_)) {
            warn!("{origin}:{line_no}: invalid UTF-8 replaced with U+FFFD");
        }
        let line = decoded.strip_suffix('\n').unwrap_or(&decoded);
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(options.separator).collect();

        let columns = match expected {
            Some(columns) => columns,
            None => {
                let columns = fields.len();
                check_column_range(options, columns, origin)?;
                expected = Some(columns);
                columns
            }
        };
        if header_pending {
            header_pending = false;
            debug!("Skipping header row: {line}");
            continue;
        }
        if fields.len() != columns {
            return Err(DatasetError::ColumnCount {
                origin: origin.to_string(),
                line: line_no,
                expected: columns,
                found: fields.len(),
            });
        }

        let raw_label = fields[options.label_column];
        let label = parse_label(raw_label).ok_or_else(|| DatasetError::InvalidLabel {
            origin: origin.to_string(),
            line: line_no,
            value: raw_label.to_string(),
        })?;
        records.push(Record::labeled(fields[options.text_column], label));
    }
    Ok(records)
}

/// Parse a boolean label cell: `1`/`true` or `0`/`false`, case-insensitive.
pub fn parse_label(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn check_column_range(
    options: &LoaderOptions,
    columns: usize,
    origin: &str,
) -> Result<(), DatasetError> {
    for column in [options.text_column, options.label_column] {
        if column >= columns {
            return Err(DatasetError::MissingColumn {
                origin: origin.to_string(),
                column,
                columns,
            });
        }
    }
    Ok(())
}

fn open_error(path: &Path, source: std::io::Error) -> DatasetError {
    if source.kind() == ErrorKind::NotFound {
        DatasetError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        DatasetError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}
