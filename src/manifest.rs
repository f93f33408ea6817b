//! Manifest reader. Turns the delimited upload manifest into a lazy stream
//! of rows, one field map per line.
//!
//! Rows with the wrong column count come back as `Err` without ending the
//! iteration, so the caller can record them and keep going.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::Delimiter;

/// Columns the uploader reads. Any of them may be absent from the header;
/// absent columns read as empty strings.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "filename",
    "title",
    "description",
    "tags",
    "license",
    "album",
    "system_id",
];

const BOM: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to open manifest {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Manifest has no header row")]
    MissingHeader,

    #[error(
        "Malformed manifest row{}: {message}",
        .line.map(|l| format!(" at line {l}")).unwrap_or_default()
    )]
    MalformedRow { line: Option<u64>, message: String },

    #[error("Failed to read manifest: {0}")]
    Read(String),
}

impl ManifestError {
    pub fn line(&self) -> Option<u64> {
        match self {
            ManifestError::MalformedRow { line, .. } => *line,
            _ => None,
        }
    }

    fn from_csv(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        match err.kind() {
            csv::ErrorKind::Io(_) => ManifestError::Read(err.to_string()),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => ManifestError::MalformedRow {
                line,
                message: format!("expected {expected_len} fields, found {len}"),
            },
            _ => ManifestError::MalformedRow {
                line,
                message: err.to_string(),
            },
        }
    }
}

/// Strip a leading BOM, surrounding whitespace and surrounding double quotes.
pub fn clean_field(raw: &str) -> &str {
    raw.trim_start_matches(BOM).trim().trim_matches('"').trim()
}

/// One manifest line as a column → value map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub line: Option<u64>,
    fields: HashMap<String, String>,
}

impl ManifestRow {
    pub fn new(line: Option<u64>, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Value of `column`, or `""` if the manifest has no such column.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

/// A normalized manifest row ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub line: Option<u64>,
    pub source_path: PathBuf,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub license_label: String,
    pub collection_name: Option<String>,
    pub external_id: Option<String>,
}

impl UploadRecord {
    /// Build a record from a row. Relative paths are joined onto
    /// `base_directory` when one is configured.
    pub fn from_row(row: &ManifestRow, base_directory: Option<&Path>) -> Self {
        let filename = PathBuf::from(row.get("filename"));
        let source_path = match base_directory {
            Some(base) if filename.is_relative() && !filename.as_os_str().is_empty() => {
                base.join(filename)
            }
            _ => filename,
        };
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        Self {
            line: row.line,
            source_path,
            title: row.get("title").to_string(),
            description: row.get("description").to_string(),
            tags: row.get("tags").to_string(),
            license_label: row.get("license").to_string(),
            collection_name: non_empty(row.get("album")),
            external_id: non_empty(row.get("system_id")),
        }
    }
}

/// Lazy, single-pass manifest iterator.
pub struct ManifestReader<R: Read> {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<R>,
    finished: bool,
}

impl ManifestReader<File> {
    pub fn open(path: &Path, delimiter: Delimiter) -> Result<Self, ManifestError> {
        let file = File::open(path).map_err(|source| ManifestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, delimiter)
    }
}

impl<R: Read> ManifestReader<R> {
    pub fn from_reader(reader: R, delimiter: Delimiter) -> Result<Self, ManifestError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(ManifestError::from_csv)?
            .iter()
            .map(|h| clean_field(h).to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ManifestError::MissingHeader);
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !headers.iter().any(|h| h == c))
            .collect();
        if !missing.is_empty() {
            tracing::warn!(
                ?missing,
                "Manifest header is missing columns; they will read as empty"
            );
        }
        tracing::debug!(?headers, "Manifest header");

        Ok(Self {
            headers,
            records: csv_reader.into_records(),
            finished: false,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> Iterator for ManifestReader<R> {
    type Item = Result<ManifestRow, ManifestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.records.next()? {
            Ok(record) => {
                let line = record.position().map(|p| p.line());
                let fields = self
                    .headers
                    .iter()
                    .zip(record.iter())
                    .map(|(h, v)| (h.clone(), clean_field(v).to_string()))
                    .collect();
                Some(Ok(ManifestRow::new(line, fields)))
            }
            Err(e) => {
                let err = ManifestError::from_csv(e);
                // An I/O failure leaves the reader in an unknown position.
                if matches!(err, ManifestError::Read(_)) {
                    self.finished = true;
                }
                Some(Err(err))
            }
        }
    }
}
