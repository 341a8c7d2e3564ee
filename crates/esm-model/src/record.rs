//! Raw and normalized transaction records.

use chrono::NaiveDate;

use crate::columns::Column;
use crate::ids::RecordId;

/// Label used for categorical values that are missing in the source.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One denormalized transaction exactly as read from the source.
///
/// Every field holds the trimmed cell text; optional columns that are absent
/// from the input are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub id: RecordId,
    /// 1-based record position in the source (header excluded).
    pub position: u64,
    pub product_id: String,
    pub category: String,
    pub subcategory: String,
    pub price: String,
    pub cost: String,
    pub customer_id: String,
    pub segment: String,
    pub customer_country: String,
    pub store_id: String,
    pub store_type: String,
    pub store_country: String,
    pub transaction_date: String,
    pub units_sold: String,
    pub revenue: String,
    pub satisfaction_score: String,
    pub failure_flag: String,
    pub energy_consumption: String,
    pub transaction_id: String,
    pub product_name: String,
    pub discount: String,
    pub payment_method: String,
}

impl RawRecord {
    /// Create an empty record at the given position.
    pub fn new(id: RecordId, position: u64) -> Self {
        Self {
            id,
            position,
            ..Self::default()
        }
    }

    /// Cell text for a column.
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::ProductId => &self.product_id,
            Column::Category => &self.category,
            Column::Subcategory => &self.subcategory,
            Column::Price => &self.price,
            Column::Cost => &self.cost,
            Column::CustomerId => &self.customer_id,
            Column::Segment => &self.segment,
            Column::CustomerCountry => &self.customer_country,
            Column::StoreId => &self.store_id,
            Column::StoreType => &self.store_type,
            Column::StoreCountry => &self.store_country,
            Column::TransactionDate => &self.transaction_date,
            Column::UnitsSold => &self.units_sold,
            Column::Revenue => &self.revenue,
            Column::SatisfactionScore => &self.satisfaction_score,
            Column::FailureFlag => &self.failure_flag,
            Column::EnergyConsumption => &self.energy_consumption,
            Column::TransactionId => &self.transaction_id,
            Column::ProductName => &self.product_name,
            Column::Discount => &self.discount,
            Column::PaymentMethod => &self.payment_method,
        }
    }

    /// Mutable cell text for a column.
    pub fn get_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::ProductId => &mut self.product_id,
            Column::Category => &mut self.category,
            Column::Subcategory => &mut self.subcategory,
            Column::Price => &mut self.price,
            Column::Cost => &mut self.cost,
            Column::CustomerId => &mut self.customer_id,
            Column::Segment => &mut self.segment,
            Column::CustomerCountry => &mut self.customer_country,
            Column::StoreId => &mut self.store_id,
            Column::StoreType => &mut self.store_type,
            Column::StoreCountry => &mut self.store_country,
            Column::TransactionDate => &mut self.transaction_date,
            Column::UnitsSold => &mut self.units_sold,
            Column::Revenue => &mut self.revenue,
            Column::SatisfactionScore => &mut self.satisfaction_score,
            Column::FailureFlag => &mut self.failure_flag,
            Column::EnergyConsumption => &mut self.energy_consumption,
            Column::TransactionId => &mut self.transaction_id,
            Column::ProductName => &mut self.product_name,
            Column::Discount => &mut self.discount,
            Column::PaymentMethod => &mut self.payment_method,
        }
    }

    /// Builder-style setter, mostly useful in tests.
    #[must_use]
    pub fn with(mut self, column: Column, value: impl Into<String>) -> Self {
        *self.get_mut(column) = value.into();
        self
    }
}

/// Product attributes of a normalized record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAttributes {
    pub product_id: String,
    pub category: String,
    pub subcategory: String,
    pub product_name: String,
    /// Unit list price.
    pub price: f64,
    /// Unit cost.
    pub cost: f64,
}

/// Customer attributes of a normalized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerAttributes {
    pub customer_id: String,
    pub segment: String,
    pub country: String,
}

/// Store attributes of a normalized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreAttributes {
    pub store_id: String,
    pub store_type: String,
    pub country: String,
}

/// Quantitative measures of a normalized record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measures {
    pub units_sold: i64,
    pub revenue: f64,
    /// Fraction in [0, 1].
    pub discount: f64,
    /// Score in [0, 100].
    pub satisfaction_score: f64,
    pub failure_flag: bool,
    /// Non-negative kWh.
    pub energy_consumption: f64,
}

/// What the normalizer did to a field that was not usable as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum ImputationKind {
    /// Value was empty; the field fallback was used.
    Defaulted,
    /// Value could not be coerced; the field fallback was used.
    Malformed { raw: String },
    /// Value was outside the field domain and was clamped.
    Clamped { from: f64, to: f64 },
}

impl ImputationKind {
    pub fn label(&self) -> &'static str {
        match self {
            ImputationKind::Defaulted => "defaulted",
            ImputationKind::Malformed { .. } => "malformed",
            ImputationKind::Clamped { .. } => "clamped",
        }
    }
}

/// A single field-level correction applied during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Imputation {
    pub column: Column,
    pub kind: ImputationKind,
}

/// A cleaned, fully typed transaction record.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub id: RecordId,
    pub position: u64,
    pub transaction_id: String,
    pub transaction_date: NaiveDate,
    pub product: ProductAttributes,
    pub customer: CustomerAttributes,
    pub store: StoreAttributes,
    pub measures: Measures,
    pub payment_method: String,
    pub imputations: Vec<Imputation>,
}

impl NormalizedRecord {
    /// Whether any field of this record was defaulted, coerced or clamped.
    pub fn was_imputed(&self) -> bool {
        !self.imputations.is_empty()
    }

    /// Imputation applied to a specific column, if any.
    pub fn imputation_for(&self, column: Column) -> Option<&ImputationKind> {
        self.imputations
            .iter()
            .find(|imputation| imputation.column == column)
            .map(|imputation| &imputation.kind)
    }
}
