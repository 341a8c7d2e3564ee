//! Field-level normalization functions.
//!
//! - **numeric**: decimal, count and flag coercion
//! - **categorical**: whitespace, case and synonym standardization
//! - **date**: transaction date parsing
//! - **range**: domain clamping

pub mod categorical;
pub mod date;
pub mod numeric;
pub mod range;

pub use categorical::{
    CaseRule, canonical_country, canonical_segment, collapse_whitespace, is_missing_token,
    normalize_label, title_case,
};
pub use date::parse_transaction_date;
pub use numeric::{Coerced, parse_count, parse_decimal, parse_flag};
pub use range::{
    AMOUNT_BOUNDS, Bounds, DISCOUNT_BOUNDS, ENERGY_BOUNDS, MAX_AMOUNT, REVENUE_BOUNDS,
    SATISFACTION_BOUNDS,
};
