//! Core types for the electric product star schema.
//!
//! - **columns**: the fixed input column set
//! - **error**: record-level errors
//! - **ids**: record identifiers and surrogate keys
//! - **record**: raw and normalized transaction records
//! - **dimension**: dimension rows, natural keys and tables
//! - **lookup**: natural-key to surrogate-key indices
//! - **fact**: sales and performance fact rows
//! - **schema**: the assembled star schema
//! - **report**: validation issues and reports
//! - **options**: pipeline configuration
//! - **redact**: record-level log redaction

pub mod columns;
pub mod dimension;
pub mod error;
pub mod fact;
pub mod ids;
pub mod lookup;
pub mod options;
pub mod record;
pub mod redact;
pub mod report;
pub mod schema;

pub use columns::Column;
pub use dimension::{
    CustomerKey, CustomerRow, DateRow, DimensionEntity, DimensionKind, DimensionTable, ProductKey,
    ProductRow, StoreKey, StoreRow,
};
pub use error::{RecordError, RecordErrorKind};
pub use fact::{FactKind, FactRow, PerformanceFact, ResolutionGap, SalesFact};
pub use ids::{RecordId, SurrogateKey};
pub use lookup::LookupIndex;
pub use options::{PipelineOptions, TieBreakPolicy};
pub use record::{
    CustomerAttributes, Imputation, ImputationKind, Measures, NormalizedRecord, ProductAttributes,
    RawRecord, StoreAttributes, UNKNOWN_LABEL,
};
pub use report::{Issue, Severity, ValidationReport};
pub use schema::{LookupIndices, StarSchema, TableCount};
