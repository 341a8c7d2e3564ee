//! Record normalizer.
//!
//! Turns each raw record into a typed [`NormalizedRecord`]. Unusable fields
//! fall back to per-field defaults and are recorded as imputations; only
//! structurally required fields can fail a record.

use std::collections::BTreeMap;

use esm_model::redact::redact_value;
use esm_model::{
    Column, CustomerAttributes, Imputation, ImputationKind, Measures, NormalizedRecord,
    ProductAttributes, RawRecord, RecordError, RecordErrorKind, StoreAttributes, UNKNOWN_LABEL,
};

use crate::normalization::{
    AMOUNT_BOUNDS, Bounds, CaseRule, Coerced, DISCOUNT_BOUNDS, ENERGY_BOUNDS, REVENUE_BOUNDS,
    SATISFACTION_BOUNDS, canonical_country, canonical_segment, collapse_whitespace,
    normalize_label, parse_count, parse_decimal, parse_flag, parse_transaction_date,
};

/// Neutral satisfaction score used when the source has none (3 on a 5-point scale).
pub const DEFAULT_SATISFACTION: f64 = 60.0;

/// Collects imputations for one record.
struct FieldCleaner<'a> {
    raw: &'a RawRecord,
    imputations: Vec<Imputation>,
}

impl<'a> FieldCleaner<'a> {
    fn new(raw: &'a RawRecord) -> Self {
        Self {
            raw,
            imputations: Vec::new(),
        }
    }

    fn record(&mut self, column: Column, kind: ImputationKind) {
        tracing::trace!(
            position = self.raw.position,
            column = %column,
            value = %redact_value(self.raw.get(column)),
            kind = kind.label(),
            "imputed field"
        );
        self.imputations.push(Imputation { column, kind });
    }

    fn fallback<T>(&mut self, column: Column, coerced: Coerced<T>, default: T) -> T {
        match coerced {
            Coerced::Value(value) => value,
            Coerced::Missing => {
                self.record(column, ImputationKind::Defaulted);
                default
            }
            Coerced::Malformed => {
                let raw = self.raw.get(column).to_string();
                self.record(column, ImputationKind::Malformed { raw });
                default
            }
        }
    }

    fn decimal(&mut self, column: Column, default: f64) -> f64 {
        let coerced = parse_decimal(self.raw.get(column));
        self.fallback(column, coerced, default)
    }

    fn bounded(&mut self, column: Column, default: f64, bounds: Bounds) -> f64 {
        let value = self.decimal(column, default);
        match bounds.clamp(value) {
            Some(clamped) => {
                self.record(
                    column,
                    ImputationKind::Clamped {
                        from: value,
                        to: clamped,
                    },
                );
                clamped
            }
            None => value,
        }
    }

    fn count(&mut self, column: Column) -> i64 {
        let coerced = parse_count(self.raw.get(column));
        self.fallback(column, coerced, 0)
    }

    fn flag(&mut self, column: Column) -> bool {
        let coerced = parse_flag(self.raw.get(column));
        self.fallback(column, coerced, false)
    }

    fn label(&mut self, column: Column, rule: CaseRule) -> String {
        self.label_with(column, |value| normalize_label(value, rule))
    }

    fn label_with(&mut self, column: Column, normalize: impl Fn(&str) -> Option<String>) -> String {
        match normalize(self.raw.get(column)) {
            Some(value) => value,
            None => {
                self.record(column, ImputationKind::Defaulted);
                UNKNOWN_LABEL.to_string()
            }
        }
    }

    /// Identifiers are taken as written; only a blank cell is missing.
    fn required_id(&self, column: Column) -> Result<String, RecordErrorKind> {
        let value = collapse_whitespace(self.raw.get(column));
        if value.is_empty() {
            return Err(RecordErrorKind::MissingRequired { column });
        }
        Ok(value)
    }
}

/// Normalize a single raw record.
pub fn normalize_record(raw: &RawRecord) -> Result<NormalizedRecord, RecordError> {
    normalize_fields(raw).map_err(|kind| RecordError::new(raw.position, raw.id, kind))
}

fn normalize_fields(raw: &RawRecord) -> Result<NormalizedRecord, RecordErrorKind> {
    let mut cleaner = FieldCleaner::new(raw);

    let product_id = cleaner.required_id(Column::ProductId)?;
    let customer_id = cleaner.required_id(Column::CustomerId)?;
    let store_id = cleaner.required_id(Column::StoreId)?;
    let transaction_date = parse_transaction_date(raw.get(Column::TransactionDate)).ok_or_else(
        || RecordErrorKind::InvalidDate {
            column: Column::TransactionDate,
            raw: raw.get(Column::TransactionDate).to_string(),
        },
    )?;

    let transaction_id = normalize_label(raw.get(Column::TransactionId), CaseRule::Preserve)
        .unwrap_or_else(|| {
            cleaner.record(Column::TransactionId, ImputationKind::Defaulted);
            format!("T-{}", raw.position)
        });

    let product = ProductAttributes {
        product_id,
        category: cleaner.label(Column::Category, CaseRule::Upper),
        subcategory: cleaner.label(Column::Subcategory, CaseRule::Title),
        product_name: cleaner.label(Column::ProductName, CaseRule::Title),
        price: cleaner.bounded(Column::Price, 0.0, AMOUNT_BOUNDS),
        cost: cleaner.bounded(Column::Cost, 0.0, AMOUNT_BOUNDS),
    };

    let customer = CustomerAttributes {
        customer_id,
        segment: cleaner.label_with(Column::Segment, canonical_segment),
        country: cleaner.label_with(Column::CustomerCountry, canonical_country),
    };

    let store = StoreAttributes {
        store_id,
        store_type: cleaner.label(Column::StoreType, CaseRule::Title),
        country: cleaner.label_with(Column::StoreCountry, canonical_country),
    };

    let measures = Measures {
        units_sold: cleaner.count(Column::UnitsSold),
        revenue: cleaner.bounded(Column::Revenue, 0.0, REVENUE_BOUNDS),
        discount: cleaner.bounded(Column::Discount, 0.0, DISCOUNT_BOUNDS),
        satisfaction_score: cleaner.bounded(
            Column::SatisfactionScore,
            DEFAULT_SATISFACTION,
            SATISFACTION_BOUNDS,
        ),
        failure_flag: cleaner.flag(Column::FailureFlag),
        energy_consumption: cleaner.bounded(Column::EnergyConsumption, 0.0, ENERGY_BOUNDS),
    };

    let payment_method = cleaner.label(Column::PaymentMethod, CaseRule::Title);

    Ok(NormalizedRecord {
        id: raw.id,
        position: raw.position,
        transaction_id,
        transaction_date,
        product,
        customer,
        store,
        measures,
        payment_method,
        imputations: cleaner.imputations,
    })
}

/// Running counts kept by a [`Normalizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    pub records: usize,
    pub rejected: usize,
    /// Records with at least one imputation.
    pub imputed_records: usize,
    /// Imputations per column.
    pub imputations: BTreeMap<Column, usize>,
}

impl NormalizationStats {
    fn observe(&mut self, result: &Result<NormalizedRecord, RecordError>) {
        self.records += 1;
        match result {
            Ok(record) => {
                if record.was_imputed() {
                    self.imputed_records += 1;
                }
                for imputation in &record.imputations {
                    *self.imputations.entry(imputation.column).or_default() += 1;
                }
            }
            Err(_) => self.rejected += 1,
        }
    }

    pub fn total_imputations(&self) -> usize {
        self.imputations.values().sum()
    }
}

/// Iterator adapter yielding one normalization result per input record.
///
/// Records that could not be read upstream pass through as errors, so the
/// output always has the same length as the input.
pub struct Normalizer<I> {
    inner: I,
    stats: NormalizationStats,
}

impl<I> Normalizer<I>
where
    I: Iterator<Item = Result<RawRecord, RecordError>>,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            stats: NormalizationStats::default(),
        }
    }

    pub fn stats(&self) -> &NormalizationStats {
        &self.stats
    }
}

impl<I> Iterator for Normalizer<I>
where
    I: Iterator<Item = Result<RawRecord, RecordError>>,
{
    type Item = Result<NormalizedRecord, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?.and_then(|raw| normalize_record(&raw));
        self.stats.observe(&result);
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

type PassThrough = fn(RawRecord) -> Result<RawRecord, RecordError>;

/// Normalize already-read records.
pub fn normalize_records<I>(records: I) -> Normalizer<std::iter::Map<I::IntoIter, PassThrough>>
where
    I: IntoIterator<Item = RawRecord>,
{
    Normalizer::new(records.into_iter().map(Ok as PassThrough))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::MAX_AMOUNT;
    use esm_model::RecordId;

    fn raw(position: u64) -> RawRecord {
        RawRecord::new(RecordId::derive("test.csv", position), position)
            .with(Column::ProductId, "HeatPump-X")
            .with(Column::Category, "hvac")
            .with(Column::Subcategory, "heat pump")
            .with(Column::Price, "500")
            .with(Column::Cost, "300")
            .with(Column::CustomerId, "C-17")
            .with(Column::Segment, "home")
            .with(Column::CustomerCountry, "USA")
            .with(Column::StoreId, "S-3")
            .with(Column::StoreType, "big  box")
            .with(Column::StoreCountry, "u.s.")
            .with(Column::TransactionDate, "2023-05-01")
            .with(Column::UnitsSold, "2")
            .with(Column::Revenue, "1000")
            .with(Column::SatisfactionScore, "85")
            .with(Column::FailureFlag, "0")
            .with(Column::EnergyConsumption, "3.2")
    }

    #[test]
    fn standardizes_categoricals() {
        let record = normalize_record(&raw(1)).unwrap();
        assert_eq!(record.product.category, "HVAC");
        assert_eq!(record.product.subcategory, "Heat Pump");
        assert_eq!(record.customer.segment, "Residential");
        assert_eq!(record.customer.country, "United States");
        assert_eq!(record.store.country, "United States");
        assert_eq!(record.store.store_type, "Big Box");
        assert_eq!(record.product.product_id, "HeatPump-X");
    }

    #[test]
    fn optional_fields_fall_back_and_are_recorded() {
        let record = normalize_record(&raw(4)).unwrap();
        assert_eq!(record.transaction_id, "T-4");
        assert_eq!(record.product.product_name, UNKNOWN_LABEL);
        assert_eq!(record.payment_method, UNKNOWN_LABEL);
        assert_eq!(record.measures.discount, 0.0);
        assert_eq!(
            record.imputation_for(Column::Discount),
            Some(&ImputationKind::Defaulted)
        );
    }

    #[test]
    fn satisfaction_is_clamped() {
        let record = normalize_record(&raw(1).with(Column::SatisfactionScore, "150")).unwrap();
        assert_eq!(record.measures.satisfaction_score, 100.0);
        assert_eq!(
            record.imputation_for(Column::SatisfactionScore),
            Some(&ImputationKind::Clamped {
                from: 150.0,
                to: 100.0
            })
        );
    }

    #[test]
    fn malformed_numbers_use_field_defaults() {
        let record = normalize_record(
            &raw(1)
                .with(Column::SatisfactionScore, "great")
                .with(Column::Price, "n/a")
                .with(Column::UnitsSold, "2.5"),
        )
        .unwrap();
        assert_eq!(record.measures.satisfaction_score, DEFAULT_SATISFACTION);
        assert_eq!(record.product.price, 0.0);
        assert_eq!(record.measures.units_sold, 0);
        assert!(matches!(
            record.imputation_for(Column::UnitsSold),
            Some(ImputationKind::Malformed { raw }) if raw == "2.5"
        ));
    }

    #[test]
    fn empty_product_id_is_a_record_error() {
        let err = normalize_record(&raw(9).with(Column::ProductId, "  ")).unwrap_err();
        assert_eq!(err.position, 9);
        assert_eq!(
            err.kind,
            RecordErrorKind::MissingRequired {
                column: Column::ProductId
            }
        );
    }

    #[test]
    fn missing_tokens_are_valid_identifiers() {
        let record = normalize_record(
            &raw(3)
                .with(Column::ProductId, "NA")
                .with(Column::CustomerId, " null ")
                .with(Column::StoreId, "N/A"),
        )
        .unwrap();
        assert_eq!(record.product.product_id, "NA");
        assert_eq!(record.customer.customer_id, "null");
        assert_eq!(record.store.store_id, "N/A");
        assert!(record.imputation_for(Column::ProductId).is_none());
    }

    #[test]
    fn huge_amounts_are_capped() {
        let record = normalize_record(
            &raw(5)
                .with(Column::Cost, "1e308")
                .with(Column::Revenue, "-1e300"),
        )
        .unwrap();
        assert_eq!(record.product.cost, MAX_AMOUNT);
        assert_eq!(record.measures.revenue, -MAX_AMOUNT);
        assert_eq!(
            record.imputation_for(Column::Cost),
            Some(&ImputationKind::Clamped {
                from: 1.0e308,
                to: MAX_AMOUNT
            })
        );
    }

    #[test]
    fn unparseable_date_is_a_record_error() {
        let err = normalize_record(&raw(2).with(Column::TransactionDate, "05/01/23")).unwrap_err();
        assert!(matches!(err.kind, RecordErrorKind::InvalidDate { .. }));
    }

    #[test]
    fn normalizer_preserves_length_and_counts() {
        let records = vec![raw(1), raw(2).with(Column::StoreId, ""), raw(3)];
        let mut normalizer = normalize_records(records);
        let results: Vec<_> = normalizer.by_ref().collect();

        assert_eq!(results.len(), 3);
        assert!(results[1].is_err());
        let stats = normalizer.stats();
        assert_eq!(stats.records, 3);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.imputed_records, 2);
    }
}
