//! Surrogate and natural key checks.

use std::collections::{BTreeMap, HashMap};

use esm_model::{DimensionEntity, DimensionTable, FactRow, Issue, SurrogateKey};

/// Dimension keys must be unique, contiguous from 1, and carry distinct natural keys.
pub fn check_dimension<D: DimensionEntity>(table: &DimensionTable<D>) -> Vec<Issue> {
    let mut issues = Vec::new();
    let kind = table.kind();

    let mut counts: BTreeMap<SurrogateKey, usize> = BTreeMap::new();
    for row in table {
        *counts.entry(row.surrogate_key()).or_default() += 1;
    }
    for (key, count) in counts {
        if count > 1 {
            issues.push(Issue::DuplicateSurrogateKey {
                dimension: kind,
                key,
                count,
            });
        }
    }

    if let Some((row, expected, found)) = first_gap(table.iter().map(DimensionEntity::surrogate_key))
    {
        issues.push(Issue::NonContiguousSurrogateKey {
            dimension: kind,
            row,
            expected,
            found,
        });
    }

    let mut seen: HashMap<D::NaturalKey, SurrogateKey> = HashMap::with_capacity(table.len());
    for row in table {
        let natural_key = row.natural_key();
        if let Some(first) = seen.get(&natural_key) {
            issues.push(Issue::DuplicateNaturalKey {
                dimension: kind,
                natural_key: natural_key.to_string(),
                first: *first,
                duplicate: row.surrogate_key(),
            });
        } else {
            seen.insert(natural_key, row.surrogate_key());
        }
    }

    issues
}

/// Fact keys must run 1..=n in row order.
pub fn check_fact<F: FactRow>(rows: &[F]) -> Vec<Issue> {
    first_gap(rows.iter().map(FactRow::fact_key))
        .map(|(row, expected, found)| Issue::NonContiguousFactKey {
            fact: F::KIND,
            row,
            expected,
            found,
        })
        .into_iter()
        .collect()
}

/// First row (1-based) whose key differs from its position.
fn first_gap(keys: impl Iterator<Item = SurrogateKey>) -> Option<(usize, SurrogateKey, SurrogateKey)> {
    keys.enumerate().find_map(|(index, found)| {
        let expected = SurrogateKey::for_index(index);
        (found != expected).then_some((index + 1, expected, found))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use esm_model::{DateRow, DimensionKind};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
    }

    #[test]
    fn contiguous_table_passes() {
        let table = DimensionTable::from_rows(vec![
            DateRow::new(SurrogateKey::new(1), date(1)),
            DateRow::new(SurrogateKey::new(2), date(2)),
        ]);
        assert!(check_dimension(&table).is_empty());
    }

    #[test]
    fn duplicates_and_gaps_are_reported() {
        let table = DimensionTable::from_rows(vec![
            DateRow::new(SurrogateKey::new(1), date(1)),
            DateRow::new(SurrogateKey::new(1), date(2)),
            DateRow::new(SurrogateKey::new(3), date(1)),
        ]);
        let issues = check_dimension(&table);

        assert!(issues.contains(&Issue::DuplicateSurrogateKey {
            dimension: DimensionKind::Date,
            key: SurrogateKey::new(1),
            count: 2,
        }));
        assert!(issues.contains(&Issue::NonContiguousSurrogateKey {
            dimension: DimensionKind::Date,
            row: 2,
            expected: SurrogateKey::new(2),
            found: SurrogateKey::new(1),
        }));
        assert!(issues.contains(&Issue::DuplicateNaturalKey {
            dimension: DimensionKind::Date,
            natural_key: "2023-01-01".to_string(),
            first: SurrogateKey::new(1),
            duplicate: SurrogateKey::new(3),
        }));
    }
}
