//! Referential integrity: every fact foreign key must exist in its dimension.

use esm_model::{FactRow, Issue, StarSchema};

pub fn check<F: FactRow>(rows: &[F], schema: &StarSchema) -> Vec<Issue> {
    let mut issues = Vec::new();
    for fact in rows {
        for (dimension, key) in fact.foreign_keys() {
            if !schema.contains_dimension_key(dimension, key) {
                issues.push(Issue::OrphanForeignKey {
                    fact: F::KIND,
                    fact_key: fact.fact_key(),
                    record_id: fact.record_id(),
                    dimension,
                    key,
                });
            }
        }
    }
    issues
}
