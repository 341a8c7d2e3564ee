//! Sales and performance fact rows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimension::DimensionKind;
use crate::ids::{RecordId, SurrogateKey};

/// The fact tables of the star schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactKind {
    Sales,
    Performance,
}

impl FactKind {
    pub const ALL: [FactKind; 2] = [FactKind::Sales, FactKind::Performance];

    pub fn table_name(self) -> &'static str {
        match self {
            FactKind::Sales => "fact_sales",
            FactKind::Performance => "fact_performance",
        }
    }

    pub fn key_column(self) -> &'static str {
        match self {
            FactKind::Sales => "sales_key",
            FactKind::Performance => "performance_key",
        }
    }

    /// Dimensions every row of this fact table references.
    pub fn dimensions(self) -> &'static [DimensionKind] {
        match self {
            FactKind::Sales => &[
                DimensionKind::Date,
                DimensionKind::Product,
                DimensionKind::Customer,
                DimensionKind::Store,
            ],
            FactKind::Performance => &[
                DimensionKind::Date,
                DimensionKind::Product,
                DimensionKind::Store,
            ],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FactKind::Sales => "Sales",
            FactKind::Performance => "Performance",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Common view over fact rows used by the integrity checks.
pub trait FactRow {
    const KIND: FactKind;

    fn fact_key(&self) -> SurrogateKey;

    fn record_id(&self) -> RecordId;

    /// Foreign keys in the order of [`FactKind::dimensions`].
    fn foreign_keys(&self) -> Vec<(DimensionKind, SurrogateKey)>;

    /// Measures the schema declares as required.
    fn required_measures(&self) -> Vec<(&'static str, f64)>;
}

/// One sales transaction line.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesFact {
    pub sales_key: SurrogateKey,
    pub record_id: RecordId,
    pub transaction_id: String,
    pub date_key: SurrogateKey,
    pub product_key: SurrogateKey,
    pub customer_key: SurrogateKey,
    pub store_key: SurrogateKey,
    pub units_sold: i64,
    pub revenue: f64,
    pub discount: f64,
    pub cost_of_goods: f64,
    pub profit: f64,
    pub profit_margin: f64,
    pub payment_method: String,
}

impl FactRow for SalesFact {
    const KIND: FactKind = FactKind::Sales;

    fn fact_key(&self) -> SurrogateKey {
        self.sales_key
    }

    fn record_id(&self) -> RecordId {
        self.record_id
    }

    fn foreign_keys(&self) -> Vec<(DimensionKind, SurrogateKey)> {
        vec![
            (DimensionKind::Date, self.date_key),
            (DimensionKind::Product, self.product_key),
            (DimensionKind::Customer, self.customer_key),
            (DimensionKind::Store, self.store_key),
        ]
    }

    fn required_measures(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("revenue", self.revenue),
            ("discount", self.discount),
            ("cost_of_goods", self.cost_of_goods),
            ("profit", self.profit),
            ("profit_margin", self.profit_margin),
        ]
    }
}

/// Product performance observed on one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceFact {
    pub performance_key: SurrogateKey,
    pub record_id: RecordId,
    pub date_key: SurrogateKey,
    pub product_key: SurrogateKey,
    pub store_key: SurrogateKey,
    pub satisfaction_score: f64,
    pub failure_flag: bool,
    pub energy_consumption: f64,
}

impl FactRow for PerformanceFact {
    const KIND: FactKind = FactKind::Performance;

    fn fact_key(&self) -> SurrogateKey {
        self.performance_key
    }

    fn record_id(&self) -> RecordId {
        self.record_id
    }

    fn foreign_keys(&self) -> Vec<(DimensionKind, SurrogateKey)> {
        vec![
            (DimensionKind::Date, self.date_key),
            (DimensionKind::Product, self.product_key),
            (DimensionKind::Store, self.store_key),
        ]
    }

    fn required_measures(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("satisfaction_score", self.satisfaction_score),
            ("energy_consumption", self.energy_consumption),
        ]
    }
}

/// A record whose dimension lookup failed during fact assembly.
///
/// The record produces no row in `fact`; the gap is surfaced in the
/// validation report instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionGap {
    pub fact: FactKind,
    pub dimension: DimensionKind,
    pub record_id: RecordId,
    pub position: u64,
    /// Rendered natural key that was not found.
    pub natural_key: String,
}

impl fmt::Display for ResolutionGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record {} ({}): no {} key for {} in {}",
            self.position,
            self.record_id,
            self.dimension,
            self.natural_key,
            self.fact.table_name()
        )
    }
}
