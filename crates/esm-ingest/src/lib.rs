//! Transaction ingestion.
//!
//! Reads one CSV file of denormalized electric product transactions. The
//! header is resolved once against the fixed column set; rows are then
//! yielded as raw records with a deterministic record id.

pub mod error;
pub mod reader;
pub mod schema;

pub use error::{IngestError, Result};
pub use reader::{
    MAX_CSV_FILE_SIZE, ReadOptions, RecordReader, check_file_size, open_records, source_id_for,
    validate_encoding,
};
pub use schema::InputSchema;
