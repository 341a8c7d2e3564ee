//! Required fact measures must be finite.

use esm_model::{FactRow, Issue};

pub fn check<F: FactRow>(rows: &[F]) -> Vec<Issue> {
    rows.iter()
        .flat_map(|fact| {
            fact.required_measures()
                .into_iter()
                .filter(|(_, value)| !value.is_finite())
                .map(|(measure, _)| Issue::NullMeasure {
                    fact: F::KIND,
                    fact_key: fact.fact_key(),
                    record_id: fact.record_id(),
                    measure: measure.to_string(),
                })
        })
        .collect()
}
