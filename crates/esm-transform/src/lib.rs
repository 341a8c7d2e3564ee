//! Record normalization.
//!
//! Cleans raw transaction records into typed records: numeric coercion,
//! missing-value fallbacks, categorical standardization and range clamping.

pub mod normalization;
pub mod normalizer;

pub use normalizer::{
    DEFAULT_SATISFACTION, NormalizationStats, Normalizer, normalize_record, normalize_records,
};
