//! Transaction CSV reading.
//!
//! The header is checked once against the fixed column set; data rows are
//! then streamed as [`RawRecord`]s carrying their position and record id.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use esm_model::{Column, RawRecord, RecordError, RecordErrorKind, RecordId};

use crate::error::{IngestError, Result};
use crate::schema::InputSchema;

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Options for opening an input file.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Identifier used to derive record ids. Defaults to the file name.
    pub source_id: Option<String>,
    /// Reject files larger than this many bytes.
    pub max_file_size: u64,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            source_id: None,
            max_file_size: MAX_CSV_FILE_SIZE,
        }
    }
}

impl ReadOptions {
    #[must_use]
    pub fn with_source_id(mut self, source_id: Option<String>) -> Self {
        self.source_id = source_id;
        self
    }
}

/// Source identifier for record ids: the explicit id, else the file name.
pub fn source_id_for(path: &Path, explicit: Option<&str>) -> String {
    if let Some(id) = explicit.map(str::trim)
        && !id.is_empty()
    {
        return id.to_string();
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Streaming reader over the data rows of one input file.
#[derive(Debug)]
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
    schema: InputSchema,
    source_id: String,
    path: PathBuf,
    position: u64,
    row: csv::StringRecord,
}

impl<R: Read> RecordReader<R> {
    /// Wrap any reader. `path` is only used for error messages.
    pub fn from_reader(input: R, source_id: impl Into<String>, path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|source| IngestError::CsvParse {
                path: path.to_path_buf(),
                source,
            })?
            .clone();
        if headers.iter().all(|cell| cell.trim().is_empty()) {
            return Err(IngestError::EmptyCsv {
                path: path.to_path_buf(),
            });
        }

        let schema = InputSchema::resolve(headers.iter(), path)?;
        for ignored in schema.ignored() {
            tracing::debug!(path = %path.display(), column = %ignored, "ignoring unknown column");
        }

        Ok(Self {
            reader,
            schema,
            source_id: source_id.into(),
            path: path.to_path_buf(),
            position: 0,
            row: csv::StringRecord::new(),
        })
    }

    pub fn schema(&self) -> &InputSchema {
        &self.schema
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data rows consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    fn build_record(&self, id: RecordId) -> RawRecord {
        let mut record = RawRecord::new(id, self.position);
        for column in Column::ALL {
            if let Some(index) = self.schema.position(column)
                && let Some(cell) = self.row.get(index)
            {
                *record.get_mut(column) = clean_cell(cell).to_string();
            }
        }
        record
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = std::result::Result<RawRecord, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => {
                self.position += 1;
                let id = RecordId::derive(&self.source_id, self.position);
                Some(Ok(self.build_record(id)))
            }
            Err(err) => {
                self.position += 1;
                let id = RecordId::derive(&self.source_id, self.position);
                Some(Err(RecordError::new(
                    self.position,
                    id,
                    RecordErrorKind::Unreadable {
                        message: err.to_string(),
                    },
                )))
            }
        }
    }
}

/// Open an input file after size and encoding checks.
pub fn open_records(path: &Path, options: &ReadOptions) -> Result<RecordReader<BufReader<File>>> {
    check_file_size(path, options.max_file_size)?;
    validate_encoding(path)?;

    let file = File::open(path).map_err(|e| file_error(path, e))?;
    let source_id = source_id_for(path, options.source_id.as_deref());
    tracing::debug!(path = %path.display(), source_id = %source_id, "opening input");
    RecordReader::from_reader(BufReader::new(file), source_id, path)
}

/// Check file size before loading.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| file_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Reject UTF-16 input. A UTF-8 BOM is accepted and stripped from the header.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| file_error(path, e))?;
    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        let encoding = match buffer {
            [0xFF, 0xFE] => Some("UTF-16 LE"),
            [0xFE, 0xFF] => Some("UTF-16 BE"),
            _ => None,
        };
        if let Some(encoding) = encoding {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding,
            });
        }
    }
    Ok(())
}

fn file_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

fn clean_cell(cell: &str) -> &str {
    cell.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}
