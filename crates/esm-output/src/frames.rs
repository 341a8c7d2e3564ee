//! Conversion of star schema tables to Polars frames.
//!
//! Column order here is the exported column order.

use polars::prelude::{Column, DataFrame, PolarsResult};

use esm_model::{
    CustomerRow, DateRow, DimensionKind, DimensionTable, FactKind, PerformanceFact, ProductRow,
    SalesFact, StarSchema, StoreRow, SurrogateKey,
};

/// One exported table.
#[derive(Debug, Clone)]
pub struct TableFrame {
    /// Table name, also the file stem.
    pub name: &'static str,
    pub data: DataFrame,
}

impl TableFrame {
    pub fn new(name: &'static str, data: DataFrame) -> Self {
        Self { name, data }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name)
    }
}

fn keys<T>(rows: &[T], key: impl Fn(&T) -> SurrogateKey) -> Vec<u32> {
    rows.iter().map(|row| key(row).get()).collect()
}

fn strings<T>(rows: &[T], value: impl Fn(&T) -> &str) -> Vec<String> {
    rows.iter().map(|row| value(row).to_string()).collect()
}

fn values<T, V>(rows: &[T], value: impl Fn(&T) -> V) -> Vec<V> {
    rows.iter().map(value).collect()
}

pub fn date_frame(table: &DimensionTable<DateRow>) -> PolarsResult<DataFrame> {
    let rows = table.rows();
    DataFrame::new(vec![
        Column::new("date_key".into(), keys(rows, |r| r.date_key)),
        Column::new(
            "date".into(),
            values(rows, |r| r.date.format("%Y-%m-%d").to_string()),
        ),
        Column::new("date_code".into(), values(rows, |r| r.date_code)),
        Column::new("day".into(), values(rows, |r| r.day)),
        Column::new("month".into(), values(rows, |r| r.month)),
        Column::new("quarter".into(), values(rows, |r| r.quarter)),
        Column::new("year".into(), values(rows, |r| r.year)),
        Column::new("day_of_week".into(), values(rows, |r| r.day_of_week)),
        Column::new("day_name".into(), strings(rows, |r| r.day_name.as_str())),
        Column::new("month_name".into(), strings(rows, |r| r.month_name.as_str())),
        Column::new("is_weekend".into(), values(rows, |r| r.is_weekend)),
    ])
}

pub fn product_frame(table: &DimensionTable<ProductRow>) -> PolarsResult<DataFrame> {
    let rows = table.rows();
    DataFrame::new(vec![
        Column::new("product_key".into(), keys(rows, |r| r.product_key)),
        Column::new("product_id".into(), strings(rows, |r| r.product_id.as_str())),
        Column::new("category".into(), strings(rows, |r| r.category.as_str())),
        Column::new("subcategory".into(), strings(rows, |r| r.subcategory.as_str())),
        Column::new("product_name".into(), strings(rows, |r| r.product_name.as_str())),
        Column::new("price".into(), values(rows, |r| r.price)),
        Column::new("cost".into(), values(rows, |r| r.cost)),
    ])
}

pub fn customer_frame(table: &DimensionTable<CustomerRow>) -> PolarsResult<DataFrame> {
    let rows = table.rows();
    DataFrame::new(vec![
        Column::new("customer_key".into(), keys(rows, |r| r.customer_key)),
        Column::new("customer_id".into(), strings(rows, |r| r.customer_id.as_str())),
        Column::new("segment".into(), strings(rows, |r| r.segment.as_str())),
        Column::new("country".into(), strings(rows, |r| r.country.as_str())),
    ])
}

pub fn store_frame(table: &DimensionTable<StoreRow>) -> PolarsResult<DataFrame> {
    let rows = table.rows();
    DataFrame::new(vec![
        Column::new("store_key".into(), keys(rows, |r| r.store_key)),
        Column::new("store_id".into(), strings(rows, |r| r.store_id.as_str())),
        Column::new("store_type".into(), strings(rows, |r| r.store_type.as_str())),
        Column::new("country".into(), strings(rows, |r| r.country.as_str())),
    ])
}

pub fn sales_frame(rows: &[SalesFact]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new("sales_key".into(), keys(rows, |r| r.sales_key)),
        Column::new("record_id".into(), values(rows, |r| r.record_id.to_hex())),
        Column::new("transaction_id".into(), strings(rows, |r| r.transaction_id.as_str())),
        Column::new("date_key".into(), keys(rows, |r| r.date_key)),
        Column::new("product_key".into(), keys(rows, |r| r.product_key)),
        Column::new("customer_key".into(), keys(rows, |r| r.customer_key)),
        Column::new("store_key".into(), keys(rows, |r| r.store_key)),
        Column::new("units_sold".into(), values(rows, |r| r.units_sold)),
        Column::new("revenue".into(), values(rows, |r| r.revenue)),
        Column::new("discount".into(), values(rows, |r| r.discount)),
        Column::new("cost_of_goods".into(), values(rows, |r| r.cost_of_goods)),
        Column::new("profit".into(), values(rows, |r| r.profit)),
        Column::new("profit_margin".into(), values(rows, |r| r.profit_margin)),
        Column::new("payment_method".into(), strings(rows, |r| r.payment_method.as_str())),
    ])
}

pub fn performance_frame(rows: &[PerformanceFact]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new("performance_key".into(), keys(rows, |r| r.performance_key)),
        Column::new("record_id".into(), values(rows, |r| r.record_id.to_hex())),
        Column::new("date_key".into(), keys(rows, |r| r.date_key)),
        Column::new("product_key".into(), keys(rows, |r| r.product_key)),
        Column::new("store_key".into(), keys(rows, |r| r.store_key)),
        Column::new(
            "satisfaction_score".into(),
            values(rows, |r| r.satisfaction_score),
        ),
        Column::new("failure_flag".into(), values(rows, |r| r.failure_flag)),
        Column::new(
            "energy_consumption".into(),
            values(rows, |r| r.energy_consumption),
        ),
    ])
}

/// Every table of the schema as a frame: dimensions first, then facts.
pub fn schema_frames(schema: &StarSchema) -> PolarsResult<Vec<TableFrame>> {
    Ok(vec![
        TableFrame::new(
            DimensionKind::Date.table_name(),
            date_frame(&schema.dates)?,
        ),
        TableFrame::new(
            DimensionKind::Product.table_name(),
            product_frame(&schema.products)?,
        ),
        TableFrame::new(
            DimensionKind::Customer.table_name(),
            customer_frame(&schema.customers)?,
        ),
        TableFrame::new(
            DimensionKind::Store.table_name(),
            store_frame(&schema.stores)?,
        ),
        TableFrame::new(FactKind::Sales.table_name(), sales_frame(&schema.sales)?),
        TableFrame::new(
            FactKind::Performance.table_name(),
            performance_frame(&schema.performance)?,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn date_frame_has_fixed_columns() {
        let table = DimensionTable::from_rows(vec![DateRow::new(
            SurrogateKey::FIRST,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )]);
        let df = date_frame(&table).unwrap();

        assert_eq!(df.height(), 1);
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names[0], "date_key");
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn empty_schema_frames_keep_headers() {
        let frames = schema_frames(&StarSchema::default()).unwrap();
        assert_eq!(frames.len(), 6);
        assert!(frames.iter().all(|frame| frame.data.height() == 0));
        assert_eq!(frames[4].data.width(), 14);
    }
}
