//! Dimension rows, natural keys and dimension tables.

use std::fmt;
use std::hash::Hash;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::ids::SurrogateKey;
use crate::record::NormalizedRecord;

/// The four dimensions of the star schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionKind {
    Date,
    Product,
    Customer,
    Store,
}

impl DimensionKind {
    pub const ALL: [DimensionKind; 4] = [
        DimensionKind::Date,
        DimensionKind::Product,
        DimensionKind::Customer,
        DimensionKind::Store,
    ];

    /// Exported table name.
    pub fn table_name(self) -> &'static str {
        match self {
            DimensionKind::Date => "dim_date",
            DimensionKind::Product => "dim_product",
            DimensionKind::Customer => "dim_customer",
            DimensionKind::Store => "dim_store",
        }
    }

    /// Surrogate key column, shared by the dimension and the facts that join it.
    pub fn key_column(self) -> &'static str {
        match self {
            DimensionKind::Date => "date_key",
            DimensionKind::Product => "product_key",
            DimensionKind::Customer => "customer_key",
            DimensionKind::Store => "store_key",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DimensionKind::Date => "Date",
            DimensionKind::Product => "Product",
            DimensionKind::Customer => "Customer",
            DimensionKind::Store => "Store",
        }
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A deduplicated dimension entity.
///
/// Implementors define how a natural key is derived from a normalized record
/// and how a row is built from the record that first introduced that key.
pub trait DimensionEntity: Clone + fmt::Debug {
    type NaturalKey: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display;

    const KIND: DimensionKind;

    /// Natural key of the entity this record refers to.
    fn natural_key_of(record: &NormalizedRecord) -> Self::NaturalKey;

    /// Build a row from the record that introduced the natural key.
    fn from_record(key: SurrogateKey, record: &NormalizedRecord) -> Self;

    fn surrogate_key(&self) -> SurrogateKey;

    fn natural_key(&self) -> Self::NaturalKey;

    /// Whether the record carries the same non-key attributes as this row.
    fn matches_attributes(&self, _record: &NormalizedRecord) -> bool {
        true
    }

    /// Overwrite non-key attributes from a later record sharing the natural key.
    fn refresh_attributes(&mut self, _record: &NormalizedRecord) {}
}

/// Calendar date dimension row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRow {
    pub date_key: SurrogateKey,
    pub date: NaiveDate,
    /// YYYYMMDD.
    pub date_code: u32,
    pub day: u32,
    pub month: u32,
    pub quarter: u32,
    pub year: i32,
    /// 0 = Monday.
    pub day_of_week: u32,
    pub day_name: String,
    pub month_name: String,
    pub is_weekend: bool,
}

impl DateRow {
    pub fn new(date_key: SurrogateKey, date: NaiveDate) -> Self {
        let year = date.year();
        let month = date.month();
        let day = date.day();
        let weekday = date.weekday();
        let year_code = u32::try_from(year).unwrap_or(0);
        Self {
            date_key,
            date,
            date_code: year_code * 10_000 + month * 100 + day,
            day,
            month,
            quarter: (month - 1) / 3 + 1,
            year,
            day_of_week: weekday.num_days_from_monday(),
            day_name: date.format("%A").to_string(),
            month_name: date.format("%B").to_string(),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }
}

impl DimensionEntity for DateRow {
    type NaturalKey = NaiveDate;

    const KIND: DimensionKind = DimensionKind::Date;

    fn natural_key_of(record: &NormalizedRecord) -> NaiveDate {
        record.transaction_date
    }

    fn from_record(key: SurrogateKey, record: &NormalizedRecord) -> Self {
        Self::new(key, record.transaction_date)
    }

    fn surrogate_key(&self) -> SurrogateKey {
        self.date_key
    }

    fn natural_key(&self) -> NaiveDate {
        self.date
    }
}

/// Natural key of a product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductKey {
    pub product_id: String,
    pub category: String,
    pub subcategory: String,
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.product_id, self.category, self.subcategory
        )
    }
}

/// Product dimension row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub product_key: SurrogateKey,
    pub product_id: String,
    pub category: String,
    pub subcategory: String,
    pub product_name: String,
    pub price: f64,
    pub cost: f64,
}

impl DimensionEntity for ProductRow {
    type NaturalKey = ProductKey;

    const KIND: DimensionKind = DimensionKind::Product;

    fn natural_key_of(record: &NormalizedRecord) -> ProductKey {
        ProductKey {
            product_id: record.product.product_id.clone(),
            category: record.product.category.clone(),
            subcategory: record.product.subcategory.clone(),
        }
    }

    fn from_record(key: SurrogateKey, record: &NormalizedRecord) -> Self {
        let product = &record.product;
        Self {
            product_key: key,
            product_id: product.product_id.clone(),
            category: product.category.clone(),
            subcategory: product.subcategory.clone(),
            product_name: product.product_name.clone(),
            price: product.price,
            cost: product.cost,
        }
    }

    fn surrogate_key(&self) -> SurrogateKey {
        self.product_key
    }

    fn natural_key(&self) -> ProductKey {
        ProductKey {
            product_id: self.product_id.clone(),
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
        }
    }

    fn matches_attributes(&self, record: &NormalizedRecord) -> bool {
        let product = &record.product;
        self.product_name == product.product_name
            && self.price.to_bits() == product.price.to_bits()
            && self.cost.to_bits() == product.cost.to_bits()
    }

    fn refresh_attributes(&mut self, record: &NormalizedRecord) {
        self.product_name = record.product.product_name.clone();
        self.price = record.product.price;
        self.cost = record.product.cost;
    }
}

/// Natural key of a customer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerKey {
    pub customer_id: String,
    pub segment: String,
    pub country: String,
}

impl fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.customer_id, self.segment, self.country
        )
    }
}

/// Customer dimension row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub customer_key: SurrogateKey,
    pub customer_id: String,
    pub segment: String,
    pub country: String,
}

impl DimensionEntity for CustomerRow {
    type NaturalKey = CustomerKey;

    const KIND: DimensionKind = DimensionKind::Customer;

    fn natural_key_of(record: &NormalizedRecord) -> CustomerKey {
        CustomerKey {
            customer_id: record.customer.customer_id.clone(),
            segment: record.customer.segment.clone(),
            country: record.customer.country.clone(),
        }
    }

    fn from_record(key: SurrogateKey, record: &NormalizedRecord) -> Self {
        Self {
            customer_key: key,
            customer_id: record.customer.customer_id.clone(),
            segment: record.customer.segment.clone(),
            country: record.customer.country.clone(),
        }
    }

    fn surrogate_key(&self) -> SurrogateKey {
        self.customer_key
    }

    fn natural_key(&self) -> CustomerKey {
        CustomerKey {
            customer_id: self.customer_id.clone(),
            segment: self.segment.clone(),
            country: self.country.clone(),
        }
    }
}

/// Natural key of a store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreKey {
    pub store_id: String,
    pub store_type: String,
    pub country: String,
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.store_id, self.store_type, self.country)
    }
}

/// Store dimension row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRow {
    pub store_key: SurrogateKey,
    pub store_id: String,
    pub store_type: String,
    pub country: String,
}

impl DimensionEntity for StoreRow {
    type NaturalKey = StoreKey;

    const KIND: DimensionKind = DimensionKind::Store;

    fn natural_key_of(record: &NormalizedRecord) -> StoreKey {
        StoreKey {
            store_id: record.store.store_id.clone(),
            store_type: record.store.store_type.clone(),
            country: record.store.country.clone(),
        }
    }

    fn from_record(key: SurrogateKey, record: &NormalizedRecord) -> Self {
        Self {
            store_key: key,
            store_id: record.store.store_id.clone(),
            store_type: record.store.store_type.clone(),
            country: record.store.country.clone(),
        }
    }

    fn surrogate_key(&self) -> SurrogateKey {
        self.store_key
    }

    fn natural_key(&self) -> StoreKey {
        StoreKey {
            store_id: self.store_id.clone(),
            store_type: self.store_type.clone(),
            country: self.country.clone(),
        }
    }
}

/// Rows of one dimension, in surrogate-key assignment order.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionTable<D> {
    rows: Vec<D>,
}

impl<D> Default for DimensionTable<D> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<D: DimensionEntity> DimensionTable<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap rows as-is. The validator checks key contiguity, so this accepts
    /// tables that were assembled elsewhere.
    pub fn from_rows(rows: Vec<D>) -> Self {
        Self { rows }
    }

    pub fn kind(&self) -> DimensionKind {
        D::KIND
    }

    pub fn push(&mut self, row: D) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[D] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [D] {
        &mut self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, D> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row carrying the given surrogate key.
    pub fn get(&self, key: SurrogateKey) -> Option<&D> {
        if let Some(row) = key.index().and_then(|index| self.rows.get(index))
            && row.surrogate_key() == key
        {
            return Some(row);
        }
        self.rows.iter().find(|row| row.surrogate_key() == key)
    }

    pub fn contains_key(&self, key: SurrogateKey) -> bool {
        self.get(key).is_some()
    }
}

impl<'a, D> IntoIterator for &'a DimensionTable<D> {
    type Item = &'a D;
    type IntoIter = std::slice::Iter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
