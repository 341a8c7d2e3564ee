//! The fixed input column set.
//!
//! Every input file is checked against this schema once, at ingestion.
//! Downstream stages only see named record fields.

use std::fmt;

/// A column of the denormalized transaction input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    ProductId,
    Category,
    Subcategory,
    Price,
    Cost,
    CustomerId,
    Segment,
    CustomerCountry,
    StoreId,
    StoreType,
    StoreCountry,
    TransactionDate,
    UnitsSold,
    Revenue,
    SatisfactionScore,
    FailureFlag,
    EnergyConsumption,
    TransactionId,
    ProductName,
    Discount,
    PaymentMethod,
}

impl Column {
    /// All columns in canonical order (required columns first).
    pub const ALL: [Column; 21] = [
        Column::ProductId,
        Column::Category,
        Column::Subcategory,
        Column::Price,
        Column::Cost,
        Column::CustomerId,
        Column::Segment,
        Column::CustomerCountry,
        Column::StoreId,
        Column::StoreType,
        Column::StoreCountry,
        Column::TransactionDate,
        Column::UnitsSold,
        Column::Revenue,
        Column::SatisfactionScore,
        Column::FailureFlag,
        Column::EnergyConsumption,
        Column::TransactionId,
        Column::ProductName,
        Column::Discount,
        Column::PaymentMethod,
    ];

    /// Header name as it appears in the input file.
    pub fn name(self) -> &'static str {
        match self {
            Column::ProductId => "product_id",
            Column::Category => "category",
            Column::Subcategory => "subcategory",
            Column::Price => "price",
            Column::Cost => "cost",
            Column::CustomerId => "customer_id",
            Column::Segment => "segment",
            Column::CustomerCountry => "customer_country",
            Column::StoreId => "store_id",
            Column::StoreType => "store_type",
            Column::StoreCountry => "store_country",
            Column::TransactionDate => "transaction_date",
            Column::UnitsSold => "units_sold",
            Column::Revenue => "revenue",
            Column::SatisfactionScore => "satisfaction_score",
            Column::FailureFlag => "failure_flag",
            Column::EnergyConsumption => "energy_consumption",
            Column::TransactionId => "transaction_id",
            Column::ProductName => "product_name",
            Column::Discount => "discount",
            Column::PaymentMethod => "payment_method",
        }
    }

    /// Whether the column must be present in the header.
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Column::TransactionId | Column::ProductName | Column::Discount | Column::PaymentMethod
        )
    }

    /// Declared value type, used for schema listings.
    pub fn value_type(self) -> &'static str {
        match self {
            Column::Price
            | Column::Cost
            | Column::Revenue
            | Column::SatisfactionScore
            | Column::EnergyConsumption
            | Column::Discount => "decimal",
            Column::UnitsSold => "integer",
            Column::FailureFlag => "boolean",
            Column::TransactionDate => "date",
            _ => "text",
        }
    }

    /// Match a header cell, ignoring case and surrounding whitespace.
    pub fn from_header(header: &str) -> Option<Column> {
        let cleaned = header.trim().trim_matches('\u{feff}').trim();
        Column::ALL
            .into_iter()
            .find(|column| column.name().eq_ignore_ascii_case(cleaned))
    }

    /// Required columns in canonical order.
    pub fn required() -> impl Iterator<Item = Column> {
        Column::ALL.into_iter().filter(|column| column.is_required())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl serde::Serialize for Column {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
