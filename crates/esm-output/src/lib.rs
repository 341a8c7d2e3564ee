//! Star schema export.
//!
//! Tables are converted to Polars frames, the in-process form handed to
//! downstream consumers, and written as one CSV file per table. The run
//! report is written as JSON next to them.

pub mod export;
pub mod frames;

pub use export::{REPORT_FILE, ReportDocument, ensure_output_dir, export_schema, write_report_json};
pub use frames::{
    TableFrame, customer_frame, date_frame, performance_frame, product_frame, sales_frame,
    schema_frames, store_frame,
};
