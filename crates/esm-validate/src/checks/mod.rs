//! Integrity check modules.
//!
//! Each module performs one kind of check over the assembled schema.

mod keys;
mod measures;
mod referential;

use esm_model::{Issue, StarSchema};

/// Run every integrity check over a schema.
pub fn run_all(schema: &StarSchema) -> Vec<Issue> {
    let mut issues = Vec::new();

    // 1. Dimension surrogate keys: unique and contiguous from 1
    issues.extend(keys::check_dimension(&schema.dates));
    issues.extend(keys::check_dimension(&schema.products));
    issues.extend(keys::check_dimension(&schema.customers));
    issues.extend(keys::check_dimension(&schema.stores));

    // 2. Fact keys: unique and contiguous from 1
    issues.extend(keys::check_fact(&schema.sales));
    issues.extend(keys::check_fact(&schema.performance));

    // 3. Every fact foreign key resolves
    issues.extend(referential::check(&schema.sales, schema));
    issues.extend(referential::check(&schema.performance, schema));

    // 4. Required measures are finite
    issues.extend(measures::check(&schema.sales));
    issues.extend(measures::check(&schema.performance));

    issues
}
