//! Dimension building: natural-key deduplication and surrogate-key assignment.

use std::collections::BTreeMap;

use esm_model::{
    CustomerRow, DateRow, DimensionEntity, DimensionKind, DimensionTable, LookupIndex,
    LookupIndices, NormalizedRecord, ProductRow, StoreRow, SurrogateKey, TieBreakPolicy,
};

/// One dimension table with its lookup index.
#[derive(Debug, Clone)]
pub struct BuiltDimension<D: DimensionEntity> {
    pub table: DimensionTable<D>,
    pub lookup: LookupIndex<D::NaturalKey>,
    /// Records that shared an existing natural key but carried different
    /// non-key attributes.
    pub divergent_records: usize,
}

/// Build one dimension from normalized records.
///
/// Keys are assigned from 1 in first-appearance order. Later records with a
/// known natural key reuse its surrogate key; their non-key attributes are
/// ignored under [`TieBreakPolicy::FirstSeen`] and overwrite the row under
/// [`TieBreakPolicy::LastSeen`].
pub fn build_dimension<'a, D, I>(records: I, policy: TieBreakPolicy) -> BuiltDimension<D>
where
    D: DimensionEntity,
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    let mut table = DimensionTable::<D>::new();
    let mut lookup = LookupIndex::new();
    let mut divergent_records = 0;

    for record in records {
        let natural_key = D::natural_key_of(record);
        match lookup.get(&natural_key) {
            Some(existing) => {
                let Some(row) = existing.index().and_then(|index| table.rows_mut().get_mut(index))
                else {
                    continue;
                };
                if !row.matches_attributes(record) {
                    divergent_records += 1;
                    if policy == TieBreakPolicy::LastSeen {
                        row.refresh_attributes(record);
                    }
                }
            }
            None => {
                let key = SurrogateKey::for_index(table.len());
                lookup.insert(natural_key, key);
                table.push(D::from_record(key, record));
            }
        }
    }

    tracing::debug!(
        dimension = %D::KIND,
        rows = table.len(),
        divergent_records,
        "built dimension"
    );

    BuiltDimension {
        table,
        lookup,
        divergent_records,
    }
}

/// All four dimensions of a run.
#[derive(Debug, Clone, Default)]
pub struct DimensionSet {
    pub dates: DimensionTable<DateRow>,
    pub products: DimensionTable<ProductRow>,
    pub customers: DimensionTable<CustomerRow>,
    pub stores: DimensionTable<StoreRow>,
    pub lookups: LookupIndices,
    pub divergent: BTreeMap<DimensionKind, usize>,
}

impl DimensionSet {
    pub fn divergent_total(&self) -> usize {
        self.divergent.values().sum()
    }
}

/// Build every dimension. The builders are independent and run in sequence.
pub fn build_dimensions(records: &[NormalizedRecord], policy: TieBreakPolicy) -> DimensionSet {
    let dates = build_dimension::<DateRow, _>(records, policy);
    let products = build_dimension::<ProductRow, _>(records, policy);
    let customers = build_dimension::<CustomerRow, _>(records, policy);
    let stores = build_dimension::<StoreRow, _>(records, policy);

    let divergent = BTreeMap::from([
        (DimensionKind::Date, dates.divergent_records),
        (DimensionKind::Product, products.divergent_records),
        (DimensionKind::Customer, customers.divergent_records),
        (DimensionKind::Store, stores.divergent_records),
    ]);

    DimensionSet {
        dates: dates.table,
        products: products.table,
        customers: customers.table,
        stores: stores.table,
        lookups: LookupIndices {
            date: dates.lookup,
            product: products.lookup,
            customer: customers.lookup,
            store: stores.lookup,
        },
        divergent,
    }
}
