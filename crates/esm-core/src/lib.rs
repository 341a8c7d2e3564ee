//! Star schema modeling.
//!
//! - **dimensions**: natural-key deduplication and surrogate-key assignment
//! - **facts**: foreign-key resolution and derived measures
//! - **model**: both stages in order

pub mod dimensions;
pub mod facts;
pub mod model;

pub use dimensions::{BuiltDimension, DimensionSet, build_dimension, build_dimensions};
pub use facts::{FactAssembly, SalesMeasures, assemble_facts, derive_sales_measures};
pub use model::{StarModel, model_star_schema};
