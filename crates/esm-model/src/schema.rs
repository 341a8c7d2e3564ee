use chrono::NaiveDate;
use serde::Serialize;

use crate::dimension::{
    CustomerKey, CustomerRow, DateRow, DimensionKind, DimensionTable, ProductKey, ProductRow,
    StoreKey, StoreRow,
};
use crate::fact::{FactKind, PerformanceFact, SalesFact};
use crate::ids::SurrogateKey;
use crate::lookup::LookupIndex;

/// Lookup indices for all four dimensions of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupIndices {
    pub date: LookupIndex<NaiveDate>,
    pub product: LookupIndex<ProductKey>,
    pub customer: LookupIndex<CustomerKey>,
    pub store: LookupIndex<StoreKey>,
}

/// The complete dimensional model produced by one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarSchema {
    pub dates: DimensionTable<DateRow>,
    pub products: DimensionTable<ProductRow>,
    pub customers: DimensionTable<CustomerRow>,
    pub stores: DimensionTable<StoreRow>,
    pub sales: Vec<SalesFact>,
    pub performance: Vec<PerformanceFact>,
}

/// Row count of one exported table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: usize,
}

impl StarSchema {
    pub fn dimension_len(&self, kind: DimensionKind) -> usize {
        match kind {
            DimensionKind::Date => self.dates.len(),
            DimensionKind::Product => self.products.len(),
            DimensionKind::Customer => self.customers.len(),
            DimensionKind::Store => self.stores.len(),
        }
    }

    /// Whether a dimension holds a row with this surrogate key.
    pub fn contains_dimension_key(&self, kind: DimensionKind, key: SurrogateKey) -> bool {
        match kind {
            DimensionKind::Date => self.dates.contains_key(key),
            DimensionKind::Product => self.products.contains_key(key),
            DimensionKind::Customer => self.customers.contains_key(key),
            DimensionKind::Store => self.stores.contains_key(key),
        }
    }

    pub fn fact_len(&self, kind: FactKind) -> usize {
        match kind {
            FactKind::Sales => self.sales.len(),
            FactKind::Performance => self.performance.len(),
        }
    }

    /// Row counts of every table, dimensions first.
    pub fn table_counts(&self) -> Vec<TableCount> {
        let dimensions = DimensionKind::ALL.into_iter().map(|kind| TableCount {
            table: kind.table_name(),
            rows: self.dimension_len(kind),
        });
        let facts = FactKind::ALL.into_iter().map(|kind| TableCount {
            table: kind.table_name(),
            rows: self.fact_len(kind),
        });
        dimensions.chain(facts).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.table_counts().iter().all(|count| count.rows == 0)
    }
}
